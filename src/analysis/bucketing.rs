//! Long-tail bucketing of minor contributors into the `"Other"` group.
//!
//! Two policies, both per-year (a country can be `"Other"` in one year and
//! named in the next):
//!   - share threshold: countries below a minimum share of the year's total
//!     are relabeled,
//!   - top-N: only the N largest countries of a year keep their names.
//!
//! Both policies conserve totals — for every year the bucketed values sum to
//! the same total as the unbucketed input.

use std::collections::BTreeMap;

use crate::model::BucketedTotal;

/// Share of a year's total a country must reach to keep its own name.
pub const MIN_PARTICIPATION: f64 = 0.05;

/// How many countries keep their names per year under the top-N policy.
pub const TOP_COUNTRIES_PER_YEAR: usize = 4;

/// The catch-all group label.
pub const OTHER_GROUP: &str = "Other";

/// Per-year totals keyed by (year, group), in deterministic order.
fn totals_by_year(rows: &[BucketedTotal]) -> BTreeMap<i32, BTreeMap<&str, f64>> {
    let mut years: BTreeMap<i32, BTreeMap<&str, f64>> = BTreeMap::new();
    for row in rows {
        *years
            .entry(row.year)
            .or_default()
            .entry(row.group.as_str())
            .or_insert(0.0) += row.value;
    }
    years
}

fn collect_sorted(buckets: BTreeMap<(i32, String), f64>) -> Vec<BucketedTotal> {
    buckets
        .into_iter()
        .map(|((year, group), value)| BucketedTotal { group, year, value })
        .collect()
}

/// Relabels every country whose share of its year's total is strictly below
/// `min_participation` to `"Other"`, restricted to `[start_year, end_year]`
/// inclusive, then re-aggregates by (group, year).
///
/// A country sitting exactly at the threshold keeps its name. A year whose
/// total is zero has no meaningful shares and skips relabeling entirely.
/// Output is sorted by (year, group).
pub fn bucket_by_share(
    rows: &[BucketedTotal],
    min_participation: f64,
    start_year: i32,
    end_year: i32,
) -> Vec<BucketedTotal> {
    let in_range: Vec<BucketedTotal> = rows
        .iter()
        .filter(|r| start_year <= r.year && r.year <= end_year)
        .cloned()
        .collect();

    let mut buckets: BTreeMap<(i32, String), f64> = BTreeMap::new();
    for (year, groups) in totals_by_year(&in_range) {
        let total: f64 = groups.values().sum();
        for (group, value) in groups {
            let label = if total != 0.0 && value / total < min_participation {
                OTHER_GROUP
            } else {
                group
            };
            *buckets.entry((year, label.to_string())).or_insert(0.0) += value;
        }
    }
    collect_sorted(buckets)
}

/// Keeps only the `n` countries with the largest totals per year and
/// relabels everything else to a single `"Other"` total for that year.
///
/// Countries with equal totals are ranked alphabetically, so the selection
/// is deterministic. Re-aggregates by (group, year); output is sorted by
/// (year, group).
pub fn bucket_top_n(rows: &[BucketedTotal], n: usize) -> Vec<BucketedTotal> {
    let mut buckets: BTreeMap<(i32, String), f64> = BTreeMap::new();
    for (year, groups) in totals_by_year(rows) {
        // BTreeMap iteration is alphabetical; the stable sort keeps that
        // order for equal totals.
        let mut ranked: Vec<(&str, f64)> = groups.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (rank, (group, value)) in ranked.into_iter().enumerate() {
            let label = if rank < n { group } else { OTHER_GROUP };
            *buckets.entry((year, label.to_string())).or_insert(0.0) += value;
        }
    }
    collect_sorted(buckets)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
