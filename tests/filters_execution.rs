mod common;

use common::filter_test_helpers::*;
use filtrate::aggregation::agg_req::{Aggregation, Aggregations};
use filtrate::aggregation::bucket::FiltersAggregation;
use filtrate::aggregation::metric::StatsAggregation;
use filtrate::aggregation::{
    AggregationCollector, AggregationError, AggregationLimits, DistributedAggregationCollector,
};
use filtrate::query::{AllQuery, RangeQuery, TermQuery};
use filtrate::{Executor, FiltrateError};

fn request() -> Aggregations {
    Aggregations::new()
        .add(
            "parity",
            Aggregation::filters(
                FiltersAggregation::new()
                    .filter("even", TermQuery::new("even", true))
                    .filter("div3", TermQuery::new("div3", true))
                    .with_other_bucket(),
            )
            .sub_aggregation(
                "price",
                Aggregation::stats(StatsAggregation::from_field_name("price")),
            ),
        )
        .add(
            "price",
            Aggregation::stats(StatsAggregation::from_field_name("price")),
        )
}

#[test]
fn test_multithreaded_search_matches_single_threaded() -> filtrate::Result<()> {
    let index = ids_index(1_000, 37)?;
    let searcher = index.reader()?.searcher();
    let collector = AggregationCollector::from_aggs(request(), AggregationLimits::default())?;
    let single = searcher.search(&AllQuery, &collector)?;
    let executor = Executor::multi_thread(4, "filtrate-test-")?;
    let multi = searcher.search_with_executor(&AllQuery, &collector, &executor)?;
    assert_eq!(single, multi);
    assert_eq!(
        bucket_counts(multi.get("parity").unwrap()),
        vec![
            ("even".to_string(), 500),
            ("div3".to_string(), 334),
            ("_other_".to_string(), 333)
        ]
    );
    let stats = get_stats(multi.get("price").unwrap()).unwrap();
    assert_eq!(stats.count, 1_000);
    assert_eq!(stats.max, Some(9_990.0));
    Ok(())
}

#[test]
fn test_distributed_merge_matches_single_index() -> filtrate::Result<()> {
    let collector =
        DistributedAggregationCollector::from_aggs(request(), AggregationLimits::default())?;
    let left = ids_index(60, 7)?;
    let right = ids_index(60, 11)?;
    let mut merged = left.reader()?.searcher().search(&AllQuery, &collector)?;
    merged.merge_fruits(right.reader()?.searcher().search(&AllQuery, &collector)?)?;
    let results = merged.into_final_result(&AggregationLimits::default())?;
    assert_eq!(
        bucket_counts(results.get("parity").unwrap()),
        vec![
            ("even".to_string(), 60),
            ("div3".to_string(), 40),
            ("_other_".to_string(), 40)
        ]
    );
    Ok(())
}

#[test]
fn test_bucket_limit() -> filtrate::Result<()> {
    let index = ids_index(10, 10)?;
    let searcher = index.reader()?.searcher();
    // 3 parity buckets
    let collector = AggregationCollector::from_aggs(request(), AggregationLimits::new(None, Some(2)))?;
    let err = searcher.search(&AllQuery, &collector).unwrap_err();
    assert!(matches!(
        err,
        FiltrateError::AggregationError(AggregationError::BucketLimitExceeded { limit: 2, current: 3 })
    ));
    let collector = AggregationCollector::from_aggs(request(), AggregationLimits::new(None, Some(3)))?;
    assert!(searcher.search(&AllQuery, &collector).is_ok());
    Ok(())
}

#[test]
fn test_memory_limit() -> filtrate::Result<()> {
    let index = ids_index(10_000, 10_000)?;
    let searcher = index.reader()?.searcher();
    let filters = (0..64).fold(FiltersAggregation::new(), |filters, i| {
        filters.filter(format!("range_{i}"), RangeQuery::new_u64("id", i..10_000))
    });
    let aggs = Aggregations::new().add("f", Aggregation::filters(filters));
    let limits = AggregationLimits::new(Some(10_000), None);
    let collector = AggregationCollector::from_aggs(aggs, limits.clone())?;
    let err = searcher.search(&AllQuery, &collector).unwrap_err();
    assert!(matches!(
        err,
        FiltrateError::AggregationError(AggregationError::MemoryExceeded { .. })
    ));
    // Everything accounted is released once the search is over.
    assert_eq!(limits.memory_consumed().get_bytes(), 0);
    Ok(())
}

#[test]
fn test_invalid_requests() {
    let duplicate_names = Aggregations::new()
        .add("a", Aggregation::stats(StatsAggregation::from_field_name("price")))
        .add("a", Aggregation::stats(StatsAggregation::from_field_name("price")));
    assert!(matches!(
        AggregationCollector::from_aggs(duplicate_names, Default::default()),
        Err(FiltrateError::InvalidArgument(_))
    ));
    let duplicate_keys = Aggregations::new().add(
        "f",
        Aggregation::filters(
            FiltersAggregation::new()
                .filter("x", AllQuery)
                .filter("x", AllQuery)
                .keyed(true),
        ),
    );
    assert!(matches!(
        DistributedAggregationCollector::from_aggs(duplicate_keys, Default::default()),
        Err(FiltrateError::InvalidArgument(_))
    ));
}

#[test]
fn test_stats_on_text_field_fails() -> filtrate::Result<()> {
    let index = ids_index(10, 10)?;
    let searcher = index.reader()?.searcher();
    let aggs = Aggregations::new().add(
        "s",
        Aggregation::stats(StatsAggregation::from_field_name("category")),
    );
    let collector = AggregationCollector::from_aggs(aggs, Default::default())?;
    let err = searcher.search(&AllQuery, &collector).unwrap_err();
    assert!(matches!(
        err,
        FiltrateError::AggregationError(AggregationError::CompilationError { .. })
    ));
    Ok(())
}
