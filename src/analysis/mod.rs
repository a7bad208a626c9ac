//! Analytical transformations over the loaded dataset.
//!
//! Every function here is a pure transformation from borrowed input tables
//! to a freshly allocated output table — nothing is mutated in place, so
//! per-country runs can be distributed across threads by callers without
//! any shared mutable state.
//!
//! Submodules:
//! - `peaks` — crisis-period detection over a yearly count series.
//! - `bucketing` — long-tail reclassification into the "Other" group.
//! - `lattice` — dense country×year reconstruction and cumulative sums.
//! - `population` — population joins and displacement ratios.

pub mod bucketing;
pub mod lattice;
pub mod peaks;
pub mod population;
