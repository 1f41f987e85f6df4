use std::sync::Arc;

use super::{CompiledFilters, SegmentMatcher, DEFAULT_OTHER_BUCKET_KEY};
use crate::aggregation::intermediate_agg_result::{
    IntermediateAggregationResult, IntermediateFiltersBucket, IntermediateFiltersResult,
};
use crate::aggregation::{
    AggregationLimits, Aggregator, BucketAccumulator, BucketOrdinal, BucketOrdinals,
    BucketRecorder, BucketSlot, BucketStore, LeafCollector, ResourceLimitGuard,
};
use crate::{DocId, FiltrateError, SegmentReader};

/// The filters aggregation, instantiated for one segment.
///
/// The aggregator only maps documents to bucket ordinals. Counting the documents of a bucket
/// and feeding its sub-aggregations is left to the [`BucketAccumulator`].
pub struct FiltersAggregator<A: BucketAccumulator = BucketStore> {
    name: String,
    keys: Arc<[String]>,
    compiled: Arc<CompiledFilters>,
    keyed: bool,
    other_bucket_key: Option<String>,
    ordinals: BucketOrdinals,
    buckets: A,
    limits: AggregationLimits,
}

impl<A: BucketAccumulator> FiltersAggregator<A> {
    /// Creates an aggregator over `compiled`, whose filters are named by `keys`.
    pub fn new(
        name: String,
        keys: Arc<[String]>,
        compiled: Arc<CompiledFilters>,
        keyed: bool,
        other_bucket_key: Option<String>,
        buckets: A,
        limits: &AggregationLimits,
    ) -> crate::Result<FiltersAggregator<A>> {
        if keys.len() != compiled.weights().len() {
            return Err(FiltrateError::InvalidArgument(format!(
                "Aggregation {name:?} has {} keys for {} filters",
                keys.len(),
                compiled.weights().len()
            )));
        }
        let ordinals = BucketOrdinals::new(keys.len(), other_bucket_key.is_some());
        Ok(FiltersAggregator {
            name,
            keys,
            compiled,
            keyed,
            other_bucket_key,
            ordinals,
            buckets,
            limits: limits.clone(),
        })
    }

    /// The addressing of the buckets of the aggregator.
    pub fn ordinals(&self) -> BucketOrdinals {
        self.ordinals
    }

    /// The accumulator holding the buckets.
    pub fn buckets(&self) -> &A {
        &self.buckets
    }

    fn slot_key(&self, slot: BucketSlot) -> &str {
        match slot {
            BucketSlot::Filter(pos) => &self.keys[pos],
            BucketSlot::Other => self
                .other_bucket_key
                .as_deref()
                .unwrap_or(DEFAULT_OTHER_BUCKET_KEY),
        }
    }
}

impl<A: BucketAccumulator> Aggregator for FiltersAggregator<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn leaf_collector<'a>(
        &'a mut self,
        segment: &'a SegmentReader,
    ) -> crate::Result<Box<dyn LeafCollector + 'a>> {
        let mut memory_guard = self.limits.new_guard();
        let matchers = self
            .compiled
            .weights()
            .iter()
            .map(|weight| SegmentMatcher::for_segment(weight.as_ref(), segment, &mut memory_guard))
            .collect::<crate::Result<Vec<_>>>()?;
        let recorder = self.buckets.recorder(segment)?;
        Ok(Box::new(FiltersLeafCollector {
            matchers,
            ordinals: self.ordinals,
            recorder,
            _memory_guard: memory_guard,
        }))
    }

    fn build_aggregation(
        &self,
        owning_ord: BucketOrdinal,
    ) -> crate::Result<IntermediateAggregationResult> {
        let mut buckets = Vec::with_capacity(self.ordinals.total_slots() as usize);
        for slot in self.ordinals.slots() {
            let ord = self.ordinals.bucket_ord(owning_ord, slot)?;
            buckets.push(IntermediateFiltersBucket {
                key: self.slot_key(slot).to_string(),
                doc_count: self.buckets.doc_count(ord),
                sub_aggregation: self.buckets.finalize(ord)?,
            });
        }
        Ok(IntermediateAggregationResult::Filters(
            IntermediateFiltersResult {
                buckets,
                keyed: self.keyed,
            },
        ))
    }

    fn build_empty_aggregation(&self) -> IntermediateAggregationResult {
        // The "other" bucket is left out of the empty result.
        let buckets = self
            .keys
            .iter()
            .map(|key| IntermediateFiltersBucket {
                key: key.clone(),
                doc_count: 0,
                sub_aggregation: self.buckets.empty_sub_aggregation(),
            })
            .collect();
        IntermediateAggregationResult::Filters(IntermediateFiltersResult {
            buckets,
            keyed: self.keyed,
        })
    }
}

struct FiltersLeafCollector<'a> {
    matchers: Vec<SegmentMatcher>,
    ordinals: BucketOrdinals,
    recorder: Box<dyn BucketRecorder + 'a>,
    _memory_guard: ResourceLimitGuard,
}

impl LeafCollector for FiltersLeafCollector<'_> {
    fn collect(&mut self, doc: DocId, owning_ord: BucketOrdinal) -> crate::Result<()> {
        let mut matched_any = false;
        for (pos, matcher) in self.matchers.iter().enumerate() {
            if matcher.matches(doc) {
                let ord = self.ordinals.bucket_ord(owning_ord, BucketSlot::Filter(pos))?;
                self.recorder.record(ord, doc)?;
                matched_any = true;
            }
        }
        if !matched_any && self.ordinals.has_other() {
            let ord = self.ordinals.bucket_ord(owning_ord, BucketSlot::Other)?;
            self.recorder.record(ord, doc)?;
        }
        Ok(())
    }
}
