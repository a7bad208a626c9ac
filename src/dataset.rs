//! The loaded dataset snapshot and its query operations.
//!
//! `Dataset` owns one immutable snapshot of the cleaned flow and population
//! tables for its lifetime: load → use → discard. Every query operation
//! takes `&self` and returns a freshly built table, so independent
//! per-country computations can run in parallel on the same snapshot
//! without locking. There is no global state — tests and parallel pipeline
//! instances each construct their own `Dataset`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::analysis::peaks::peak_finder;
use crate::analysis::{bucketing, lattice, population};
use crate::config::OverrideFile;
use crate::loader;
use crate::logging::{self, PipelineStage};
use crate::model::{
    AnalyticsError, BucketedTotal, CountryTotal, CumulativeRow, Direction,
    DisplacementRatioRow, DisplacementSummaryRow, FlowRecord, Peak, PopulationRecord, TimePoint,
    TimeSeries, YearlyFlow,
};
use crate::names::NameTable;

/// How many rows `biggest_population_displacement` considers by default.
pub const DEFAULT_DISPLACEMENT_SUMMARY_SIZE: usize = 20;

fn by_value_desc(a: f64, b: f64) -> std::cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
}

/// One immutable snapshot of the cleaned input tables.
pub struct Dataset {
    flows: Vec<FlowRecord>,
    population: Vec<PopulationRecord>,
    names: NameTable,
}

impl Dataset {
    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Loads both cleaned CSV snapshots and builds the name table.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        asylum_path: P,
        population_path: Q,
    ) -> Result<Dataset, AnalyticsError> {
        let flows = loader::load_flow_records(asylum_path)?;
        let population = loader::load_population_records(population_path)?;
        logging::info(
            PipelineStage::Load,
            None,
            &format!("loaded {} flow records, {} population records", flows.len(), population.len()),
        );
        Ok(Dataset::from_records(flows, population))
    }

    /// Builds a snapshot from records the caller already holds. This is the
    /// entry point for tests and for callers with their own loading.
    pub fn from_records(flows: Vec<FlowRecord>, population: Vec<PopulationRecord>) -> Dataset {
        let names = NameTable::from_flows(&flows);
        Dataset { flows, population, names }
    }

    /// Applies a loaded name-override configuration on top of the built-in
    /// overrides.
    pub fn apply_name_overrides(&mut self, overrides: &OverrideFile) {
        self.names.apply_overrides(overrides);
    }

    pub fn flows(&self) -> &[FlowRecord] {
        &self.flows
    }

    pub fn population(&self) -> &[PopulationRecord] {
        &self.population
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    // -----------------------------------------------------------------------
    // Timeline and peaks
    // -----------------------------------------------------------------------

    /// Grand total of displaced people across the whole snapshot.
    pub fn total_asylum_seekers(&self) -> f64 {
        self.flows.iter().map(|r| r.count).sum()
    }

    /// Total count per year across all records — the series the crisis
    /// detector runs on.
    pub fn year_timeline(&self) -> TimeSeries {
        let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
        for record in &self.flows {
            *totals.entry(record.year).or_insert(0.0) += record.count;
        }
        TimeSeries::new(totals.into_iter().map(|(year, value)| TimePoint { year, value }).collect())
    }

    /// Per-year totals for a single origin country.
    pub fn country_yearly_totals(&self, country_abbr: &str) -> TimeSeries {
        let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
        for record in self.flows.iter().filter(|r| r.origin_abbr == country_abbr) {
            *totals.entry(record.year).or_insert(0.0) += record.count;
        }
        TimeSeries::new(totals.into_iter().map(|(year, value)| TimePoint { year, value }).collect())
    }

    /// Runs the crisis detector over the full timeline with the default
    /// thresholds.
    pub fn crisis_periods(&self) -> Vec<Peak> {
        let timeline = self.year_timeline();
        let peaks: Vec<Peak> = peak_finder(&timeline).collect();
        logging::debug(
            PipelineStage::Peaks,
            None,
            &format!("{} crisis periods over {} years", peaks.len(), timeline.len()),
        );
        peaks
    }

    // -----------------------------------------------------------------------
    // Bucketing
    // -----------------------------------------------------------------------

    /// Totals per (origin display name, year) — the unbucketed input to both
    /// bucketing policies.
    pub fn origin_totals_by_year(&self) -> Vec<BucketedTotal> {
        let mut totals: BTreeMap<(i32, &str), f64> = BTreeMap::new();
        for record in &self.flows {
            *totals.entry((record.year, record.origin_name.as_str())).or_insert(0.0) +=
                record.count;
        }
        totals
            .into_iter()
            .map(|((year, group), value)| BucketedTotal { group: group.to_string(), year, value })
            .collect()
    }

    /// Origin countries per year over `[start_year, end_year]`, with
    /// countries under 5% of their year's total bucketed into `"Other"`.
    pub fn top_origin_countries_yearly(&self, start_year: i32, end_year: i32) -> Vec<BucketedTotal> {
        bucketing::bucket_by_share(
            &self.origin_totals_by_year(),
            bucketing::MIN_PARTICIPATION,
            start_year,
            end_year,
        )
    }

    /// Origin countries per year with only the `n` largest keeping their
    /// names; everything else collapses into `"Other"`.
    pub fn top_n_origin_countries_yearly(&self, n: usize) -> Vec<BucketedTotal> {
        bucketing::bucket_top_n(&self.origin_totals_by_year(), n)
    }

    // -----------------------------------------------------------------------
    // Flows and cumulative tables
    // -----------------------------------------------------------------------

    /// Where people from `country_abbr` went: total per (year, destination),
    /// sorted by year then destination. Sparse — only observed pairs appear.
    pub fn destination_by_year(&self, country_abbr: &str) -> Vec<YearlyFlow> {
        let mut totals: BTreeMap<(i32, &str), f64> = BTreeMap::new();
        for record in self.flows.iter().filter(|r| r.origin_abbr == country_abbr) {
            *totals.entry((record.year, record.destination_abbr.as_str())).or_insert(0.0) +=
                record.count;
        }
        totals
            .into_iter()
            .map(|((year, country), count)| YearlyFlow { year, country: country.to_string(), count })
            .collect()
    }

    /// The full lattice + zero-fill + cumulative pipeline for one origin
    /// country: where its displaced population accumulated over time.
    pub fn cumulative_flow_for_country(&self, country_abbr: &str) -> Vec<CumulativeRow> {
        lattice::cumulative_flow(&self.destination_by_year(country_abbr))
    }

    /// Cumulative totals per country per year over the whole dataset,
    /// grouped on the origin or the destination side.
    ///
    /// Rows whose cumulative value is still zero are filtered out — the map
    /// layer has nothing to draw for a country before its first recorded
    /// flow.
    pub fn destination_or_origin_by_year(&self, direction: Direction) -> Vec<CumulativeRow> {
        let mut totals: BTreeMap<(i32, &str), f64> = BTreeMap::new();
        for record in &self.flows {
            let country = match direction {
                Direction::Origin => record.origin_abbr.as_str(),
                Direction::Asylum => record.destination_abbr.as_str(),
            };
            *totals.entry((record.year, country)).or_insert(0.0) += record.count;
        }
        let sparse: Vec<YearlyFlow> = totals
            .into_iter()
            .map(|((year, country), count)| YearlyFlow { year, country: country.to_string(), count })
            .collect();

        let mut rows = lattice::cumulative_flow(&sparse);
        rows.retain(|r| r.cumulative != 0.0);
        rows
    }

    // -----------------------------------------------------------------------
    // Population ratios
    // -----------------------------------------------------------------------

    /// Displacement ratios for one origin country: one row per year where
    /// the population is known.
    pub fn country_population_series(&self, country_code: &str) -> Vec<DisplacementRatioRow> {
        let displaced: Vec<YearlyFlow> = self
            .country_yearly_totals(country_code)
            .points()
            .iter()
            .map(|p| YearlyFlow { year: p.year, country: country_code.to_string(), count: p.value })
            .collect();
        population::displacement_ratios(&displaced, &self.population)
    }

    /// Displacement ratios for every origin country present in the
    /// population table, in the order countries first appear in the flow
    /// table. Countries absent from the population table are skipped and
    /// logged — never zero-filled.
    pub fn all_population_ratios(&self) -> Vec<DisplacementRatioRow> {
        let population_codes: HashSet<&str> =
            self.population.iter().map(|p| p.country_code.as_str()).collect();

        let mut seen = HashSet::new();
        let mut origin_codes = Vec::new();
        for record in &self.flows {
            if seen.insert(record.origin_abbr.as_str()) {
                origin_codes.push(record.origin_abbr.as_str());
            }
        }

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for code in &origin_codes {
            if population_codes.contains(code) {
                rows.extend(self.country_population_series(code));
            } else {
                skipped += 1;
                logging::debug(
                    PipelineStage::Population,
                    Some(code),
                    "no population data, excluded from ratio analysis",
                );
            }
        }
        logging::log_join_summary(
            PipelineStage::Population,
            origin_codes.len(),
            origin_codes.len() - skipped,
            skipped,
        );
        rows
    }

    /// The "most affected countries" summary: the `top_n` highest
    /// displacement percentages reduced to one worst year per country,
    /// sorted by percentage descending, with display names resolved.
    /// The dashboard passes [`DEFAULT_DISPLACEMENT_SUMMARY_SIZE`].
    pub fn biggest_population_displacement(&self, top_n: usize) -> Vec<DisplacementSummaryRow> {
        let mut rows = self.all_population_ratios();
        rows.sort_by(|a, b| by_value_desc(a.percentage, b.percentage));
        rows.truncate(top_n);

        let mut best = population::most_affected_years(&rows);
        best.sort_by(|a, b| by_value_desc(a.percentage, b.percentage));
        best.into_iter()
            .map(|r| DisplacementSummaryRow {
                country_name: self.names.resolve(&r.country_code).to_string(),
                country_code: r.country_code,
                year: r.year,
                displaced: r.displaced,
                population: r.population,
                percentage: r.percentage,
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Country totals
    // -----------------------------------------------------------------------

    /// Total displaced per origin country, ascending by count (the order the
    /// horizontal bar chart wants), with display names resolved.
    pub fn origin_country_totals(&self) -> Vec<CountryTotal> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in &self.flows {
            *totals.entry(record.origin_abbr.as_str()).or_insert(0.0) += record.count;
        }
        let mut rows: Vec<CountryTotal> = totals
            .into_iter()
            .map(|(code, count)| CountryTotal {
                country_code: code.to_string(),
                country_name: self.names.resolve(code).to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| a.count.partial_cmp(&b.count).unwrap_or(std::cmp::Ordering::Equal));
        rows
    }

    /// Total received per destination country, descending by count. Names
    /// come from the destination name columns (first occurrence wins), since
    /// pure destinations never contribute an origin name.
    pub fn destination_countries(&self) -> Vec<CountryTotal> {
        let mut destination_names: BTreeMap<&str, &str> = BTreeMap::new();
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in &self.flows {
            destination_names
                .entry(record.destination_abbr.as_str())
                .or_insert(record.destination_name.as_str());
            *totals.entry(record.destination_abbr.as_str()).or_insert(0.0) += record.count;
        }
        let mut rows: Vec<CountryTotal> = totals
            .into_iter()
            .map(|(code, count)| CountryTotal {
                country_code: code.to_string(),
                country_name: destination_names.get(code).copied().unwrap_or(code).to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| by_value_desc(a.count, b.count));
        rows
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        origin: (&str, &str),
        destination: (&str, &str),
        year: i32,
        count: f64,
    ) -> FlowRecord {
        FlowRecord {
            origin_abbr: origin.0.to_string(),
            origin_name: origin.1.to_string(),
            destination_abbr: destination.0.to_string(),
            destination_name: destination.1.to_string(),
            destination_region: "Europe".to_string(),
            category: "asylum_seekers".to_string(),
            year,
            count,
        }
    }

    fn pop(code: &str, year: i32, population: Option<f64>) -> PopulationRecord {
        PopulationRecord { country_code: code.to_string(), year, population }
    }

    fn mock_dataset() -> Dataset {
        Dataset::from_records(
            vec![
                record(("TGO", "Togo"), ("CHE", "Switzerland"), 1989, 25.0),
                record(("MUS", "Mauritius"), ("GBR", "United Kingdom"), 2017, 5.0),
                record(("KEN", "Kenya"), ("GBR", "United Kingdom"), 1996, 1_170.0),
            ],
            vec![
                pop("KEN", 1996, Some(27_768_296.0)),
                pop("TGO", 1989, Some(3_539_000.0)),
                pop("MUS", 2017, None),
            ],
        )
    }

    #[test]
    fn test_total_asylum_seekers_sums_all_records() {
        assert_eq!(mock_dataset().total_asylum_seekers(), 1_200.0);
    }

    #[test]
    fn test_year_timeline_is_sorted_and_grouped() {
        let timeline = mock_dataset().year_timeline();
        let points = timeline.points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], TimePoint { year: 1989, value: 25.0 });
        assert_eq!(points[2], TimePoint { year: 2017, value: 5.0 });
    }

    #[test]
    fn test_country_yearly_totals_filters_by_origin() {
        let series = mock_dataset().country_yearly_totals("KEN");
        assert_eq!(series.points(), &[TimePoint { year: 1996, value: 1_170.0 }]);
    }

    #[test]
    fn test_origin_totals_by_year_groups_by_display_input_name() {
        let totals = mock_dataset().origin_totals_by_year();
        assert_eq!(totals.len(), 3);
        assert!(totals.contains(&BucketedTotal {
            group: "Kenya".to_string(),
            year: 1996,
            value: 1_170.0
        }));
    }

    #[test]
    fn test_destination_by_year_returns_sparse_rows_only() {
        let rows = mock_dataset().destination_by_year("KEN");
        assert_eq!(
            rows,
            vec![YearlyFlow { year: 1996, country: "GBR".to_string(), count: 1_170.0 }]
        );
    }

    #[test]
    fn test_destination_by_year_unknown_country_is_empty() {
        assert!(mock_dataset().destination_by_year("ZZZ").is_empty());
    }

    #[test]
    fn test_cumulative_flow_for_country_single_row() {
        let rows = mock_dataset().cumulative_flow_for_country("KEN");
        assert_eq!(
            rows,
            vec![CumulativeRow {
                country: "GBR".to_string(),
                year: 1996,
                count: 1_170.0,
                cumulative: 1_170.0,
            }]
        );
    }

    #[test]
    fn test_destination_direction_accumulates_gbr_across_years() {
        let rows = mock_dataset().destination_or_origin_by_year(Direction::Asylum);
        // GBR received Kenya's 1170 in 1996 and Mauritius's 5 in 2017.
        let gbr_2017 = rows
            .iter()
            .find(|r| r.country == "GBR" && r.year == 2017)
            .expect("GBR/2017 must be present");
        assert_eq!(gbr_2017.count, 5.0);
        assert_eq!(gbr_2017.cumulative, 1_175.0);
    }

    #[test]
    fn test_zero_cumulative_rows_are_filtered() {
        let rows = mock_dataset().destination_or_origin_by_year(Direction::Asylum);
        assert!(rows.iter().all(|r| r.cumulative != 0.0), "got {:?}", rows);
        // GBR's first flow is in 1996, so its zero-cumulative 1989 lattice
        // cell must be gone; CHE's quiet 2017 cell survives (cumulative 25).
        assert!(!rows.iter().any(|r| r.country == "GBR" && r.year == 1989));
        assert!(rows.iter().any(|r| r.country == "CHE" && r.year == 2017 && r.cumulative == 25.0));
    }

    #[test]
    fn test_country_population_series_excludes_unknown_population() {
        let d = mock_dataset();
        // MUS has a population record, but the figure is null.
        assert!(d.country_population_series("MUS").is_empty());
        let ken = d.country_population_series("KEN");
        assert_eq!(ken.len(), 1);
        assert_eq!(ken[0].percentage, 1_170.0 / 27_768_296.0 * 100.0);
    }

    #[test]
    fn test_biggest_population_displacement_resolves_names_and_sorts() {
        let summary = mock_dataset().biggest_population_displacement(20);
        // KEN and TGO have usable population data; MUS is null-only.
        assert_eq!(summary.len(), 2);
        assert!(summary[0].percentage >= summary[1].percentage);
        assert!(summary.iter().any(|r| r.country_name == "Kenya"));
        assert!(summary.iter().any(|r| r.country_name == "Togo"));
    }

    #[test]
    fn test_biggest_population_displacement_truncates_to_top_n() {
        let summary = mock_dataset().biggest_population_displacement(1);
        assert_eq!(summary.len(), 1);
    }

    #[test]
    fn test_origin_country_totals_ascending() {
        let totals = mock_dataset().origin_country_totals();
        assert_eq!(totals.len(), 3);
        assert!(totals[0].count <= totals[1].count && totals[1].count <= totals[2].count);
        assert_eq!(totals[2].country_name, "Kenya");
    }

    #[test]
    fn test_destination_countries_descending_with_destination_names() {
        let rows = mock_dataset().destination_countries();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country_code, "GBR");
        assert_eq!(rows[0].country_name, "United Kingdom");
        assert_eq!(rows[0].count, 1_175.0);
    }

    #[test]
    fn test_name_overrides_flow_into_summaries() {
        use crate::config::parse_overrides;
        let mut d = mock_dataset();
        let overrides =
            parse_overrides("version = 1\n\n[[override]]\ncode = \"KEN\"\nname = \"Republic of Kenya\"\n")
                .expect("valid overrides");
        d.apply_name_overrides(&overrides);
        let summary = d.biggest_population_displacement(20);
        assert!(summary.iter().any(|r| r.country_name == "Republic of Kenya"));
    }
}
