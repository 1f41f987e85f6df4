//! # Metrics
//!
//! Metric aggregations compute values over the documents of a bucket, typically the values
//! of a numeric field. They are the leaves of an aggregation tree: a metric has no
//! sub-aggregation.
//!
//! The only metric is [`StatsAggregation`], which computes count, sum, min, max and average
//! of a numeric field in one pass.

mod stats;

pub use stats::{IntermediateStats, Stats, StatsAggregation, StatsAggregator, StatsAggregatorFactory};
