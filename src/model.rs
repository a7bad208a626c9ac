//! Core data types for the asylum migration analytics pipeline.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no logic beyond trivial constructors — loading lives in
//! `loader`, transformations live under `analysis`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One migration observation from the cleaned asylum snapshot.
///
/// Corresponds to one row of `Asylum_data.csv`. The full dataset is loaded
/// once into a `Dataset` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowRecord {
    #[serde(rename = "country_of_origin_abbr")]
    pub origin_abbr: String,
    #[serde(rename = "country_of_origin_name")]
    pub origin_name: String,
    #[serde(rename = "country_of_asylum_abbr")]
    pub destination_abbr: String,
    #[serde(rename = "country_of_asylum_name")]
    pub destination_name: String,
    #[serde(rename = "region_of_asylum")]
    pub destination_region: String,
    pub category: String,
    pub year: i32,
    /// Number of displaced people for this (origin, destination, year, category).
    /// Non-negative by contract with the cleaning stage; not validated here.
    pub count: f64,
}

/// Annual population figure for one country, in long format.
///
/// The cleaned population snapshot is wide (one column per year); the loader
/// pivots it into one `PopulationRecord` per (country, year). `population`
/// is `None` where the source cell was empty — absence is meaningful and is
/// handled by exclusion, never by zero-fill.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationRecord {
    pub country_code: String,
    pub year: i32,
    pub population: Option<f64>,
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// A single (year, value) observation in a yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub year: i32,
    pub value: f64,
}

/// An ordered yearly series, ascending by year.
///
/// Construction sorts the points, so the peak detector can rely on order
/// without re-checking. Duplicate years are not rejected — the cleaning
/// stage guarantees at most one value per year.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn new(mut points: Vec<TimePoint>) -> Self {
        points.sort_by_key(|p| p.year);
        TimeSeries { points }
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Result rows
// ---------------------------------------------------------------------------

/// A crisis interval over a yearly series: displacement rose sharply from a
/// baseline above the minimum-consideration threshold at `start` and stopped
/// increasing at `end`. Invariant: `start < end`; peaks emitted by one
/// detector run are non-overlapping and strictly increasing in `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Peak {
    pub start: i32,
    pub end: i32,
}

/// Total flow for one (year, country) pair — the sparse input to the
/// lattice/cumulative pipeline and the output of `destination_by_year`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyFlow {
    pub year: i32,
    pub country: String,
    pub count: f64,
}

/// One bucketed total: `group` is either an original country name or the
/// `"Other"` sentinel. For a fixed year the bucketed values sum to the same
/// total as the unbucketed input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketedTotal {
    pub group: String,
    pub year: i32,
    pub value: f64,
}

/// One cell of the dense lattice after zero-fill and cumulative aggregation.
/// `cumulative` at year Y equals the sum of `count` over all years <= Y for
/// this country, so the per-country sequence is non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeRow {
    pub country: String,
    pub year: i32,
    pub count: f64,
    pub cumulative: f64,
}

/// Displacement as a share of a country's population for one year. Only
/// produced for years where the population is known. `percentage` is never
/// clamped — cross-border double counting can legitimately push it past 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplacementRatioRow {
    pub country_code: String,
    pub year: i32,
    pub displaced: f64,
    pub population: f64,
    pub percentage: f64,
}

/// One row of the "most affected countries" summary: the worst year for one
/// country, with its display name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplacementSummaryRow {
    pub country_code: String,
    pub country_name: String,
    pub year: i32,
    pub displaced: f64,
    pub population: f64,
    pub percentage: f64,
}

/// Aggregate total for one country with its display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTotal {
    pub country_code: String,
    pub country_name: String,
    pub count: f64,
}

/// Which side of a flow record an aggregation groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Group on the country people left.
    Origin,
    /// Group on the country that received them.
    Asylum,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when loading the cleaned snapshots.
///
/// Analytical operations themselves do not fail: empty inputs produce empty
/// outputs, unknown country codes fall back to the raw code, and missing
/// population figures exclude the affected rows.
#[derive(Debug)]
pub enum AnalyticsError {
    /// An input table lacks a required column. Fatal — surfaced before any
    /// row is processed.
    MissingColumn { table: &'static str, column: String },
    /// A cell could not be parsed into the expected type.
    Parse { table: &'static str, message: String },
    /// The snapshot file could not be read.
    Io(String),
    /// The override configuration file is malformed or has an unsupported
    /// version.
    Config(String),
}

impl std::fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyticsError::MissingColumn { table, column } => {
                write!(f, "{} table is missing required column '{}'", table, column)
            }
            AnalyticsError::Parse { table, message } => {
                write!(f, "failed to parse {} table: {}", table, message)
            }
            AnalyticsError::Io(msg) => write!(f, "I/O error: {}", msg),
            AnalyticsError::Config(msg) => write!(f, "override config error: {}", msg),
        }
    }
}

impl std::error::Error for AnalyticsError {}

impl From<std::io::Error> for AnalyticsError {
    fn from(err: std::io::Error) -> Self {
        AnalyticsError::Io(err.to_string())
    }
}
