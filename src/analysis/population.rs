//! Population joins and displacement ratios.
//!
//! Joins per-country annual displaced counts against the population table
//! and expresses displacement as a percentage of population. A missing
//! population figure excludes the year from the result — zero-filling or
//! interpolating would silently fabricate a denominator, so absence is
//! always an exclusion.

use std::collections::HashMap;

use crate::model::{DisplacementRatioRow, PopulationRecord, YearlyFlow};

/// Left-joins displaced counts onto population figures on (country, year)
/// and computes `displaced / population * 100`.
///
/// Rows whose population is unknown (either no record or a `None` figure)
/// are dropped. The percentage is passed through unclamped — cross-border
/// double counting can push it past 100 and that is meaningful data, not an
/// error. Input order is preserved.
pub fn displacement_ratios(
    displaced: &[YearlyFlow],
    population: &[PopulationRecord],
) -> Vec<DisplacementRatioRow> {
    let figures: HashMap<(&str, i32), f64> = population
        .iter()
        .filter_map(|p| p.population.map(|value| ((p.country_code.as_str(), p.year), value)))
        .collect();

    displaced
        .iter()
        .filter_map(|row| {
            figures
                .get(&(row.country.as_str(), row.year))
                .map(|&population| DisplacementRatioRow {
                    country_code: row.country.clone(),
                    year: row.year,
                    displaced: row.count,
                    population,
                    percentage: row.count / population * 100.0,
                })
        })
        .collect()
}

/// Selects, per country, the single year with the maximum percentage.
///
/// Ties resolve to the first occurrence in input order; the output keeps the
/// order in which countries first appear.
pub fn most_affected_years(rows: &[DisplacementRatioRow]) -> Vec<DisplacementRatioRow> {
    let mut best: Vec<DisplacementRatioRow> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();
    for row in rows {
        match index_of.get(&row.country_code) {
            None => {
                index_of.insert(row.country_code.clone(), best.len());
                best.push(row.clone());
            }
            Some(&i) => {
                // Strictly greater, so an equal later year never displaces
                // the first occurrence.
                if row.percentage > best[i].percentage {
                    best[i] = row.clone();
                }
            }
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
