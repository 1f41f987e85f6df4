//! Per-ordinal document counts and nested aggregation state.

use super::intermediate_agg_result::IntermediateAggregationResults;
use super::{
    AggregationError, AggregationLimits, Aggregator, BucketOrdinal, LeafCollector,
    ResourceLimitGuard,
};
use crate::{DocId, SegmentReader};

/// Records the documents of one segment into a [`BucketAccumulator`].
pub trait BucketRecorder {
    /// Records `doc` into the bucket at ordinal `ord`.
    ///
    /// The document is counted and forwarded to the sub-aggregations of the bucket.
    fn record(&mut self, ord: BucketOrdinal, doc: DocId) -> crate::Result<()>;
}

/// Ordinal indexed storage of the buckets of a multi-bucket aggregation.
///
/// A bucket aggregation only knows how to map documents to ordinals: counting them and
/// computing the sub-aggregations of each bucket is the job of the accumulator.
pub trait BucketAccumulator: Send {
    /// Returns the recorder for the documents of `segment`.
    fn recorder<'a>(
        &'a mut self,
        segment: &'a SegmentReader,
    ) -> crate::Result<Box<dyn BucketRecorder + 'a>>;

    /// Number of documents recorded at `ord`. Zero if nothing was ever recorded there.
    fn doc_count(&self, ord: BucketOrdinal) -> u64;

    /// Builds the sub-aggregations of the bucket at `ord`.
    fn finalize(&self, ord: BucketOrdinal) -> crate::Result<IntermediateAggregationResults>;

    /// The sub-aggregations of a bucket that never saw a segment.
    fn empty_sub_aggregation(&self) -> IntermediateAggregationResults;
}

/// The default [`BucketAccumulator`]: a growable vector of counts, plus named
/// sub-aggregators receiving `(doc, ordinal)` for every recorded document.
///
/// The memory taken by the counts is accounted against the request's memory limit.
pub struct BucketStore {
    doc_counts: Vec<u64>,
    sub_aggregators: Vec<Box<dyn Aggregator>>,
    memory_guard: ResourceLimitGuard,
}

impl BucketStore {
    /// Creates an empty store.
    pub fn new(sub_aggregators: Vec<Box<dyn Aggregator>>, limits: &AggregationLimits) -> Self {
        BucketStore {
            doc_counts: Vec::new(),
            sub_aggregators,
            memory_guard: limits.new_guard(),
        }
    }

    /// The sub-aggregators every bucket is forwarded to.
    pub fn sub_aggregators(&self) -> &[Box<dyn Aggregator>] {
        &self.sub_aggregators
    }
}

fn ord_to_index(ord: BucketOrdinal) -> Result<usize, AggregationError> {
    // The flat ordinal is its own owning ordinal with a single slot.
    usize::try_from(ord).map_err(|_| AggregationError::OrdinalOverflow {
        owning_ordinal: ord,
        total_slots: 1,
    })
}

impl BucketAccumulator for BucketStore {
    fn recorder<'a>(
        &'a mut self,
        segment: &'a SegmentReader,
    ) -> crate::Result<Box<dyn BucketRecorder + 'a>> {
        let sub_collectors = self
            .sub_aggregators
            .iter_mut()
            .map(|sub_aggregator| sub_aggregator.leaf_collector(segment))
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(Box::new(BucketStoreRecorder {
            doc_counts: &mut self.doc_counts,
            memory_guard: &mut self.memory_guard,
            sub_collectors,
        }))
    }

    fn doc_count(&self, ord: BucketOrdinal) -> u64 {
        usize::try_from(ord)
            .ok()
            .and_then(|idx| self.doc_counts.get(idx))
            .copied()
            .unwrap_or(0)
    }

    fn finalize(&self, ord: BucketOrdinal) -> crate::Result<IntermediateAggregationResults> {
        let mut results = IntermediateAggregationResults::default();
        for sub_aggregator in &self.sub_aggregators {
            let result = sub_aggregator.build_aggregation(ord)?;
            results.push(sub_aggregator.name().to_string(), result);
        }
        Ok(results)
    }

    fn empty_sub_aggregation(&self) -> IntermediateAggregationResults {
        let mut results = IntermediateAggregationResults::default();
        for sub_aggregator in &self.sub_aggregators {
            results.push(
                sub_aggregator.name().to_string(),
                sub_aggregator.build_empty_aggregation(),
            );
        }
        results
    }
}

struct BucketStoreRecorder<'a> {
    doc_counts: &'a mut Vec<u64>,
    memory_guard: &'a mut ResourceLimitGuard,
    sub_collectors: Vec<Box<dyn LeafCollector + 'a>>,
}

impl BucketRecorder for BucketStoreRecorder<'_> {
    #[inline]
    fn record(&mut self, ord: BucketOrdinal, doc: DocId) -> crate::Result<()> {
        let idx = ord_to_index(ord)?;
        if idx >= self.doc_counts.len() {
            let new_len = idx
                .checked_add(1)
                .ok_or(AggregationError::OrdinalOverflow {
                    owning_ordinal: ord,
                    total_slots: 1,
                })?;
            // Accounted before allocating, so that a huge ordinal fails instead of aborting.
            let num_new_buckets = (new_len - self.doc_counts.len()) as u64;
            self.memory_guard.add_memory_consumed(
                num_new_buckets.saturating_mul(std::mem::size_of::<u64>() as u64),
            )?;
            self.doc_counts.resize(new_len, 0);
        }
        self.doc_counts[idx] += 1;
        for sub_collector in &mut self.sub_collectors {
            sub_collector.collect(doc, ord)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BucketAccumulator, BucketStore};
    use crate::aggregation::intermediate_agg_result::IntermediateAggregationResult;
    use crate::aggregation::metric::{IntermediateStats, StatsAggregation, StatsAggregatorFactory};
    use crate::aggregation::{
        AggregationContext, AggregationError, AggregationLimits, AggregatorFactory,
    };
    use crate::schema::Schema;
    use crate::{FiltrateError, Index, Searcher};

    fn searcher() -> crate::Result<Searcher> {
        let mut schema_builder = Schema::builder();
        let price = schema_builder.add_u64_field("price");
        let index = Index::create_in_ram(schema_builder.build());
        let mut writer = index.writer();
        for i in 0..4u64 {
            writer.add_document(doc!(price => i * 10))?;
        }
        writer.commit()?;
        Ok(index.reader()?.searcher())
    }

    #[test]
    fn test_bucket_store_counts_and_forwards() -> crate::Result<()> {
        let searcher = searcher()?;
        let limits = AggregationLimits::default();
        let ctx = AggregationContext::new(&searcher, &limits);
        let stats_factory =
            StatsAggregatorFactory::new("price_stats", StatsAggregation::from_field_name("price"));
        let mut store = BucketStore::new(vec![stats_factory.create(&ctx)?], &limits);
        let segment = searcher.segment_reader(0);
        {
            let mut recorder = store.recorder(segment)?;
            recorder.record(0, 0)?;
            recorder.record(3, 1)?;
            recorder.record(3, 3)?;
        }
        assert_eq!(store.doc_count(0), 1);
        assert_eq!(store.doc_count(1), 0);
        assert_eq!(store.doc_count(3), 2);
        assert_eq!(store.doc_count(1_000), 0);
        assert!(limits.memory_consumed().get_bytes() >= 4 * 8);

        let finalized = store.finalize(3)?;
        let Some(IntermediateAggregationResult::Stats(stats)) = finalized.get("price_stats") else {
            panic!("expected stats");
        };
        let stats = stats.finalize();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.sum, 40.0);

        let untouched = store.finalize(2)?;
        assert_eq!(
            untouched.get("price_stats"),
            Some(&IntermediateAggregationResult::Stats(IntermediateStats::default()))
        );
        let empty = store.empty_sub_aggregation();
        assert_eq!(empty.keys().collect::<Vec<_>>(), vec!["price_stats"]);
        drop(store);
        assert_eq!(limits.memory_consumed().get_bytes(), 0);
        Ok(())
    }

    #[test]
    fn test_bucket_store_memory_limit() -> crate::Result<()> {
        let searcher = searcher()?;
        let limits = AggregationLimits::new(Some(1_000), None);
        let mut store = BucketStore::new(Vec::new(), &limits);
        let mut recorder = store.recorder(searcher.segment_reader(0))?;
        recorder.record(100, 0)?;
        let err = recorder.record(1 << 40, 0).err().unwrap();
        assert!(matches!(
            err,
            FiltrateError::AggregationError(AggregationError::MemoryExceeded { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_bucket_store_record_at_max_ordinal() -> crate::Result<()> {
        let searcher = searcher()?;
        let limits = AggregationLimits::default();
        let mut store = BucketStore::new(Vec::new(), &limits);
        let mut recorder = store.recorder(searcher.segment_reader(0))?;
        let err = recorder.record(u64::MAX, 0).err().unwrap();
        assert!(matches!(
            err,
            FiltrateError::AggregationError(AggregationError::OrdinalOverflow {
                owning_ordinal: u64::MAX,
                total_slots: 1,
            })
        ));
        recorder.record(2, 0)?;
        drop(recorder);
        assert_eq!(store.doc_count(2), 1);
        assert_eq!(store.doc_count(u64::MAX), 0);
        Ok(())
    }

    #[test]
    fn test_bucket_store_huge_ordinal_with_memory_held_elsewhere() -> crate::Result<()> {
        let searcher = searcher()?;
        let limits = AggregationLimits::default();
        let mut other_guard = limits.new_guard();
        other_guard.add_memory_consumed(16)?;
        let mut store = BucketStore::new(Vec::new(), &limits);
        {
            let mut recorder = store.recorder(searcher.segment_reader(0))?;
            let err = recorder.record(1 << 61, 0).err().unwrap();
            assert!(matches!(
                err,
                FiltrateError::AggregationError(AggregationError::MemoryExceeded { .. })
            ));
        }
        assert_eq!(store.doc_count(1 << 61), 0);
        assert_eq!(limits.memory_consumed().get_bytes(), 16);
        drop(store);
        drop(other_guard);
        assert_eq!(limits.memory_consumed().get_bytes(), 0);
        Ok(())
    }
}
