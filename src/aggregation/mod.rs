//! # Aggregations
//!
//! An aggregation summarizes the documents matching a query as buckets and metrics.
//!
//! The main bucket aggregation is the [filters aggregation](bucket::FiltersAggregation): an
//! ordered list of named filters partitions the matching documents into one bucket per
//! filter. Filters are not mutually exclusive, and documents matching no filter can be routed
//! into a catch-all "other" bucket. Every bucket can carry sub-aggregations, for instance a
//! [stats metric](metric::StatsAggregation) or another filters aggregation.
//!
//! ## Usage
//! To use aggregations, build an aggregation request by constructing
//! [`Aggregations`](agg_req::Aggregations).
//! Create an [`AggregationCollector`] from this request. `AggregationCollector` implements the
//! [`Collector`](crate::collector::Collector) trait and can be passed as collector into
//! [`Searcher::search()`](crate::Searcher::search).
//!
//! ## JSON Format
//! Aggregation results serialize into elasticsearch compatible JSON.
//!
//! # Nested Aggregation
//!
//! ```
//! use filtrate::aggregation::agg_req::{Aggregation, Aggregations};
//! use filtrate::aggregation::bucket::FiltersAggregation;
//! use filtrate::query::RangeQuery;
//!
//! let cheap_then_in_stock = Aggregation::filters(
//!     FiltersAggregation::new().filter("cheap", RangeQuery::new_u64("price", 0..10)),
//! )
//! .sub_aggregation(
//!     "in_stock",
//!     Aggregation::filters(
//!         FiltersAggregation::new()
//!             .filter("available", RangeQuery::new_u64("stock", 1..u64::MAX))
//!             .with_other_bucket(),
//!     ),
//! );
//! let aggs = Aggregations::new().add("price_ranges", cheap_then_in_stock);
//! assert_eq!(aggs.len(), 1);
//! ```
//!
//! # Code organization
//!
//! Collection happens in two phases. During the collect phase, every segment gets its own
//! tree of [`Aggregator`]s, created by the [`AggregatorFactory`]s of the request. Documents are
//! recorded at bucket ordinals (see [`BucketOrdinals`]) of a [`BucketAccumulator`], which
//! forwards them to the sub-aggregations. During the build phase, every bucket is read back
//! into [`IntermediateAggregationResults`](intermediate_agg_result::IntermediateAggregationResults),
//! which merge across segments and are turned into the final
//! [`AggregationResults`](agg_result::AggregationResults).
//!
//! # Distributed Aggregation
//! When the data is distributed on different [`Index`](crate::Index) instances, the
//! [`DistributedAggregationCollector`] provides functionality to merge data between independent
//! search calls by returning
//! [`IntermediateAggregationResults`](intermediate_agg_result::IntermediateAggregationResults).
//! `IntermediateAggregationResults` provides the
//! [`merge_fruits`](intermediate_agg_result::IntermediateAggregationResults::merge_fruits) method
//! to merge multiple results. The merged result can then be converted into
//! [`AggregationResults`](agg_result::AggregationResults) via the
//! [`into_final_result`](intermediate_agg_result::IntermediateAggregationResults::into_final_result) method.

mod agg_limits;
pub mod agg_req;
pub mod agg_result;
mod aggregator;
pub mod bucket;
mod bucket_store;
mod collector;
mod error;
pub mod intermediate_agg_result;
pub mod metric;
mod ordinal;

pub use agg_limits::{AggregationLimits, ResourceLimitGuard};
pub use aggregator::{AggregationContext, Aggregator, AggregatorFactory, LeafCollector};
pub use bucket_store::{BucketAccumulator, BucketRecorder, BucketStore};
pub use collector::{AggregationCollector, DistributedAggregationCollector};
pub use error::AggregationError;
pub use ordinal::{BucketOrdinal, BucketOrdinals, BucketSlot};
use serde::{Deserialize, Serialize};

/// The default bucket limit of a request.
pub const DEFAULT_BUCKET_LIMIT: u32 = 65000;

/// The default memory limit of a request, in bytes.
pub const DEFAULT_MEMORY_LIMIT: u64 = 500_000_000;

/// Represents an associative array `(key => values)` in a very efficient manner.
///
/// Entries keep their insertion order, which is the order of the request.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct VecWithNames<T> {
    values: Vec<T>,
    keys: Vec<String>,
}

impl<T> Default for VecWithNames<T> {
    fn default() -> Self {
        Self {
            values: Default::default(),
            keys: Default::default(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for VecWithNames<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> VecWithNames<T> {
    pub(crate) fn push(&mut self, key: String, value: T) {
        self.keys.push(key);
        self.values.push(value);
    }
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.keys().zip(self.values.iter())
    }
    pub(crate) fn into_iter(self) -> impl Iterator<Item = (String, T)> {
        self.keys.into_iter().zip(self.values)
    }
    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(|key| key.as_str())
    }
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.values.iter_mut()
    }
    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
    pub(crate) fn get(&self, name: &str) -> Option<&T> {
        self.keys()
            .position(|key| key == name)
            .map(|pos| &self.values[pos])
    }
}
