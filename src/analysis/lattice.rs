//! Dense country×year reconstruction and cumulative flow aggregation.
//!
//! Cumulative sums are only well-defined over a gapless series, but the flow
//! table is sparse: a destination with no arrivals in some year simply has
//! no row. The lattice is the cross product of every country and every year
//! observed anywhere in the input — the union on both axes, never the
//! intersection — so each country gets a zero-filled cell for each quiet
//! year before the running sum is taken.
//!
//! The whole pipeline is one grouped pass: index the sparse rows, walk the
//! lattice in (country, year) order, accumulate.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CumulativeRow, YearlyFlow};

/// Builds the dense cross product of all countries × all years observed in
/// `rows`, in (country, year) ascending order, one cell per pair. Values are
/// deliberately absent — they are filled by the join in `cumulative_flow`.
pub fn dense_lattice(rows: &[YearlyFlow]) -> Vec<(String, i32)> {
    let countries: BTreeSet<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    let years: BTreeSet<i32> = rows.iter().map(|r| r.year).collect();

    let mut lattice = Vec::with_capacity(countries.len() * years.len());
    for country in &countries {
        for &year in &years {
            lattice.push(((*country).to_string(), year));
        }
    }
    lattice
}

/// Left-joins the sparse flows onto the dense lattice (missing cells get a
/// count of zero) and computes the running cumulative sum per country in
/// ascending year order.
///
/// With non-negative counts each country's cumulative sequence is
/// non-decreasing, and its final value equals the sum of that country's raw
/// counts. Empty input produces empty output.
pub fn cumulative_flow(rows: &[YearlyFlow]) -> Vec<CumulativeRow> {
    // Duplicate (country, year) rows are summed, matching a group-then-join.
    let mut sparse: BTreeMap<(&str, i32), f64> = BTreeMap::new();
    for row in rows {
        *sparse.entry((row.country.as_str(), row.year)).or_insert(0.0) += row.count;
    }

    let mut result = Vec::new();
    let mut cumulative = 0.0;
    let mut current_country = String::new();
    for (country, year) in dense_lattice(rows) {
        if country != current_country {
            cumulative = 0.0;
            current_country = country.clone();
        }
        let count = sparse.get(&(country.as_str(), year)).copied().unwrap_or(0.0);
        cumulative += count;
        result.push(CumulativeRow { country, year, count, cumulative });
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
