//! Statistics and aggregation modules.
//!
//! Everything here is a pure function over in-memory data: no I/O, no
//! shared state.

pub mod aggregator;
pub mod queries;
pub mod stats;

pub use aggregator::{aggregate, aggregate_long, melt};
pub use queries::{best_method_per_subject, overall_mean_per_method, subjects_in_order};
