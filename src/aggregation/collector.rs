use super::agg_req::Aggregations;
use super::agg_result::AggregationResults;
use super::intermediate_agg_result::IntermediateAggregationResults;
use super::{
    AggregationContext, AggregationLimits, Aggregator, AggregatorFactory, BucketAccumulator,
    BucketStore,
};
use crate::collector::Collector;
use crate::docset::COLLECT_BLOCK_BUFFER_LEN;
use crate::query::Weight;
use crate::{DocId, Searcher, SegmentReader};

/// The ordinal of the single bucket holding all the documents matching the query.
const ROOT_ORD: u64 = 0;

/// Collector for aggregations.
///
/// The collector collects all aggregations by the underlying aggregation request.
///
/// The request is turned into factories once, when the collector is created. Compiled filters
/// are therefore shared by all the segments of a search, and by successive searches on the
/// same searcher.
pub struct AggregationCollector {
    root: AggregationRoot,
}

impl AggregationCollector {
    /// Create collector from aggregation request.
    ///
    /// Fails if the request is invalid. Aggregation fails when the limits in
    /// `AggregationLimits` are exceeded (memory limit and bucket limit).
    pub fn from_aggs(aggs: Aggregations, limits: AggregationLimits) -> crate::Result<Self> {
        Ok(AggregationCollector {
            root: AggregationRoot::new(&aggs, limits)?,
        })
    }
}

/// Collector for distributed aggregations.
///
/// The collector collects all aggregations by the underlying aggregation request.
///
/// # Purpose
/// DistributedAggregationCollector returns `IntermediateAggregationResults` and not the final
/// `AggregationResults`, so that results from different indices can be merged and then
/// converted into the final `AggregationResults` via the `into_final_result()` method.
pub struct DistributedAggregationCollector {
    root: AggregationRoot,
}

impl DistributedAggregationCollector {
    /// Create collector from aggregation request.
    ///
    /// Fails if the request is invalid. Aggregation fails when the memory limit of
    /// `AggregationLimits` is exceeded.
    pub fn from_aggs(aggs: Aggregations, limits: AggregationLimits) -> crate::Result<Self> {
        Ok(DistributedAggregationCollector {
            root: AggregationRoot::new(&aggs, limits)?,
        })
    }
}

impl Collector for DistributedAggregationCollector {
    type Fruit = IntermediateAggregationResults;

    type SegmentFruit = IntermediateAggregationResults;

    fn collect_segment(
        &self,
        searcher: &Searcher,
        weight: &dyn Weight,
        segment_reader: &SegmentReader,
    ) -> crate::Result<Self::SegmentFruit> {
        self.root.collect_segment(searcher, weight, segment_reader)
    }

    fn merge_fruits(
        &self,
        searcher: &Searcher,
        segment_fruits: Vec<Self::SegmentFruit>,
    ) -> crate::Result<Self::Fruit> {
        self.root.merge_fruits(searcher, segment_fruits)
    }
}

impl Collector for AggregationCollector {
    type Fruit = AggregationResults;

    type SegmentFruit = IntermediateAggregationResults;

    fn collect_segment(
        &self,
        searcher: &Searcher,
        weight: &dyn Weight,
        segment_reader: &SegmentReader,
    ) -> crate::Result<Self::SegmentFruit> {
        self.root.collect_segment(searcher, weight, segment_reader)
    }

    fn merge_fruits(
        &self,
        searcher: &Searcher,
        segment_fruits: Vec<Self::SegmentFruit>,
    ) -> crate::Result<Self::Fruit> {
        let res = self.root.merge_fruits(searcher, segment_fruits)?;
        res.into_final_result(&self.root.limits)
    }
}

/// The top level aggregations of a request.
///
/// They behave as the sub-aggregations of a single bucket, holding every document matching
/// the query.
struct AggregationRoot {
    factories: Vec<Box<dyn AggregatorFactory>>,
    limits: AggregationLimits,
}

impl AggregationRoot {
    fn new(aggs: &Aggregations, limits: AggregationLimits) -> crate::Result<AggregationRoot> {
        Ok(AggregationRoot {
            factories: aggs.build_factories()?,
            limits,
        })
    }

    fn create_root_bucket(&self, searcher: &Searcher) -> crate::Result<BucketStore> {
        let ctx = AggregationContext::new(searcher, &self.limits);
        let aggregators = self
            .factories
            .iter()
            .map(|factory| factory.create(&ctx))
            .collect::<crate::Result<Vec<Box<dyn Aggregator>>>>()?;
        Ok(BucketStore::new(aggregators, &self.limits))
    }

    fn collect_segment(
        &self,
        searcher: &Searcher,
        weight: &dyn Weight,
        segment_reader: &SegmentReader,
    ) -> crate::Result<IntermediateAggregationResults> {
        let mut root_bucket = self.create_root_bucket(searcher)?;
        {
            let mut recorder = root_bucket.recorder(segment_reader)?;
            let mut scorer = weight.scorer(segment_reader)?;
            let mut buffer: [DocId; COLLECT_BLOCK_BUFFER_LEN] = [0; COLLECT_BLOCK_BUFFER_LEN];
            loop {
                let num_docs = scorer.fill_buffer(&mut buffer);
                if num_docs == 0 {
                    break;
                }
                for &doc in &buffer[..num_docs] {
                    recorder.record(ROOT_ORD, doc)?;
                }
            }
        }
        root_bucket.finalize(ROOT_ORD)
    }

    fn merge_fruits(
        &self,
        searcher: &Searcher,
        segment_fruits: Vec<IntermediateAggregationResults>,
    ) -> crate::Result<IntermediateAggregationResults> {
        if segment_fruits.is_empty() {
            return Ok(self.create_root_bucket(searcher)?.empty_sub_aggregation());
        }
        let mut fruits = segment_fruits.into_iter();
        let mut merged = fruits.next().unwrap_or_default();
        for fruit in fruits {
            merged.merge_fruits(fruit)?;
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::{AggregationCollector, DistributedAggregationCollector};
    use crate::aggregation::agg_req::{Aggregation, Aggregations};
    use crate::aggregation::agg_result::AggregationResult;
    use crate::aggregation::bucket::FiltersAggregation;
    use crate::aggregation::intermediate_agg_result::IntermediateAggregationResult;
    use crate::aggregation::AggregationLimits;
    use crate::query::{AllQuery, RangeQuery, TermQuery};
    use crate::schema::Schema;
    use crate::Index;

    fn index() -> crate::Result<Index> {
        let mut schema_builder = Schema::builder();
        let color = schema_builder.add_text_field("color");
        let size = schema_builder.add_u64_field("size");
        let index = Index::create_in_ram(schema_builder.build());
        let mut writer = index.writer();
        writer.add_document(doc!(color => "red", size => 1u64))?;
        writer.add_document(doc!(color => "blue", size => 2u64))?;
        writer.commit()?;
        writer.add_document(doc!(color => "red", size => 3u64))?;
        writer.add_document(doc!(color => "green", size => 4u64))?;
        writer.commit()?;
        Ok(index)
    }

    fn colors() -> Aggregations {
        Aggregations::new().add(
            "colors",
            Aggregation::filters(
                FiltersAggregation::new()
                    .filter("red", TermQuery::new("color", "red"))
                    .filter("big", RangeQuery::new_u64("size", 2..10))
                    .with_other_bucket(),
            ),
        )
    }

    #[test]
    fn test_collect_over_segments() -> crate::Result<()> {
        let index = index()?;
        let searcher = index.reader()?.searcher();
        let collector = AggregationCollector::from_aggs(colors(), AggregationLimits::default())?;
        let results = searcher.search(&AllQuery, &collector)?;
        let Some(AggregationResult::Filters(colors)) = results.get("colors") else {
            panic!("expected a filters result");
        };
        let counts: Vec<(&str, u64)> = colors
            .iter()
            .map(|(key, bucket)| (key, bucket.doc_count))
            .collect();
        assert_eq!(counts, vec![("red", 2), ("big", 3), ("_other_", 0)]);
        Ok(())
    }

    #[test]
    fn test_query_restricts_documents() -> crate::Result<()> {
        let index = index()?;
        let searcher = index.reader()?.searcher();
        let collector = DistributedAggregationCollector::from_aggs(colors(), Default::default())?;
        let query = TermQuery::new("color", "red");
        let results = searcher.search(&query, &collector)?;
        let Some(IntermediateAggregationResult::Filters(colors)) = results.get("colors") else {
            panic!("expected a filters result");
        };
        let counts: Vec<u64> = colors.buckets.iter().map(|bucket| bucket.doc_count).collect();
        assert_eq!(counts, vec![2, 1, 0]);
        Ok(())
    }

    #[test]
    fn test_no_segment_takes_the_empty_path() -> crate::Result<()> {
        let mut schema_builder = Schema::builder();
        schema_builder.add_text_field("color");
        schema_builder.add_u64_field("size");
        let index = Index::create_in_ram(schema_builder.build());
        let searcher = index.reader()?.searcher();
        let collector = DistributedAggregationCollector::from_aggs(colors(), Default::default())?;
        let results = searcher.search(&AllQuery, &collector)?;
        let Some(IntermediateAggregationResult::Filters(colors)) = results.get("colors") else {
            panic!("expected a filters result");
        };
        let keys: Vec<&str> = colors.buckets.iter().map(|bucket| bucket.key.as_str()).collect();
        assert_eq!(keys, vec!["red", "big"]);
        Ok(())
    }
}
