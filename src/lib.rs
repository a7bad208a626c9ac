//! Batch analytics over historical asylum-migration flows.
//!
//! This crate is the analytical core behind a migration map/timeline
//! dashboard. It loads one immutable snapshot of cleaned flow and
//! population tables and derives the tabular artifacts the visualization
//! layer consumes:
//!
//! - crisis-period detection over the yearly displacement timeline
//!   ([`analysis::peaks`]),
//! - per-year bucketing of minor origin countries into `"Other"`
//!   ([`analysis::bucketing`]),
//! - dense country×year cumulative flow tables ([`analysis::lattice`]),
//! - population-normalized displacement ratios
//!   ([`analysis::population`]).
//!
//! Everything is synchronous, deterministic, and pure over the snapshot —
//! no network, no database, no mutation in place. Rendering, hover text,
//! and the dashboard itself live elsewhere.
//!
//! ```no_run
//! use asylum_analytics::{Dataset, Direction};
//!
//! let data = Dataset::load("Asylum_data.csv", "Population_data.csv")?;
//! for peak in data.crisis_periods() {
//!     println!("crisis from {} to {}", peak.start, peak.end);
//! }
//! let arrivals = data.destination_or_origin_by_year(Direction::Asylum);
//! # Ok::<(), asylum_analytics::AnalyticsError>(())
//! ```

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod loader;
pub mod logging;
pub mod model;
pub mod names;

pub use analysis::peaks::{peak_finder, PeakDetector};
pub use dataset::Dataset;
pub use model::{
    AnalyticsError, BucketedTotal, CountryTotal, CumulativeRow, Direction,
    DisplacementRatioRow, DisplacementSummaryRow, FlowRecord, Peak, PopulationRecord, TimePoint,
    TimeSeries, YearlyFlow,
};
