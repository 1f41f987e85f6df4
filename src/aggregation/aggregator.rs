//! The traits driving the collection of an aggregation tree.
//!
//! An [`AggregatorFactory`] lives as long as its request and creates one [`Aggregator`] per
//! segment. The aggregator hands out a [`LeafCollector`] for the collect phase, then builds
//! the intermediate result of each of its owning buckets.

use super::intermediate_agg_result::IntermediateAggregationResult;
use super::{AggregationLimits, BucketOrdinal};
use crate::{DocId, Searcher, SegmentReader};

/// What an aggregator is created against.
#[derive(Clone, Copy)]
pub struct AggregationContext<'a> {
    searcher: &'a Searcher,
    limits: &'a AggregationLimits,
}

impl<'a> AggregationContext<'a> {
    /// Creates a new context.
    pub fn new(searcher: &'a Searcher, limits: &'a AggregationLimits) -> Self {
        AggregationContext { searcher, limits }
    }

    /// The searcher the request runs on.
    pub fn searcher(&self) -> &'a Searcher {
        self.searcher
    }

    /// The resource limits of the request.
    pub fn limits(&self) -> &'a AggregationLimits {
        self.limits
    }
}

/// Receives the documents of one segment during the collect phase.
pub trait LeafCollector {
    /// Collects `doc`, a member of the bucket `owning_ord` of the enclosing aggregation.
    fn collect(&mut self, doc: DocId, owning_ord: BucketOrdinal) -> crate::Result<()>;

    /// Collects a block of docs, all members of the bucket `owning_ord`.
    fn collect_block(&mut self, docs: &[DocId], owning_ord: BucketOrdinal) -> crate::Result<()> {
        for &doc in docs {
            self.collect(doc, owning_ord)?;
        }
        Ok(())
    }
}

/// An aggregation instantiated for a segment.
pub trait Aggregator: Send {
    /// The name of the aggregation in the request.
    fn name(&self) -> &str;

    /// Returns the collector of the documents of `segment`.
    fn leaf_collector<'a>(
        &'a mut self,
        segment: &'a SegmentReader,
    ) -> crate::Result<Box<dyn LeafCollector + 'a>>;

    /// Builds the result for the bucket `owning_ord` of the enclosing aggregation.
    ///
    /// Owning buckets that never received a document yield a zero result.
    fn build_aggregation(
        &self,
        owning_ord: BucketOrdinal,
    ) -> crate::Result<IntermediateAggregationResult>;

    /// Builds the result of an aggregation that saw no segment at all.
    fn build_empty_aggregation(&self) -> IntermediateAggregationResult;
}

/// Creates the aggregators of one aggregation of a request.
pub trait AggregatorFactory: Send + Sync {
    /// The name of the aggregation in the request.
    fn name(&self) -> &str;

    /// Creates an aggregator for `ctx`.
    ///
    /// This is called for every segment, and must be cheap when the searcher did not
    /// change.
    fn create(&self, ctx: &AggregationContext<'_>) -> crate::Result<Box<dyn Aggregator>>;
}
