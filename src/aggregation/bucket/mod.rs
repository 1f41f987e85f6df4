//! Module for all bucket aggregations.
//!
//! Bucket aggregations create buckets of documents. Each bucket is associated with a rule
//! which determines whether or not a document falls into it. Documents are recorded at the
//! [ordinal](super::BucketOrdinals) of their bucket, and every bucket forwards its documents
//! to its sub-aggregations.
//!
//! The only bucket aggregation is the [filters aggregation](FiltersAggregation).

mod filters;

pub use filters::{
    CompiledFilters, FiltersAggregation, FiltersAggregator, FiltersAggregatorFactory,
    SegmentMatcher, DEFAULT_OTHER_BUCKET_KEY,
};
