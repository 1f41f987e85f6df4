//! Contains the intermediate aggregation tree, that can be merged.
//! Intermediate aggregation results can be used to merge results between segments or between
//! indices.

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};

use super::agg_result::{
    AggregationResult, AggregationResults, BucketEntries, FiltersBucketEntry, FiltersResult,
};
use super::metric::IntermediateStats;
use super::{AggregationError, AggregationLimits, VecWithNames};
use crate::FiltrateError;

/// Contains the intermediate aggregation result, which is optimized to be merged with other
/// intermediate results.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntermediateAggregationResults {
    pub(crate) aggs: VecWithNames<IntermediateAggregationResult>,
}

impl IntermediateAggregationResults {
    pub(crate) fn push(&mut self, name: String, result: IntermediateAggregationResult) {
        self.aggs.push(name, result);
    }

    /// Returns the result of the aggregation named `name`.
    pub fn get(&self, name: &str) -> Option<&IntermediateAggregationResult> {
        self.aggs.get(name)
    }

    /// Names of the aggregations, in request order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.aggs.keys()
    }

    /// Returns true if the tree holds no aggregation.
    pub fn is_empty(&self) -> bool {
        self.aggs.is_empty()
    }

    /// Convert intermediate result to the final result.
    ///
    /// Fails if the final result holds more buckets than the bucket limit.
    pub fn into_final_result(self, limits: &AggregationLimits) -> crate::Result<AggregationResults> {
        let res = self.into_final_result_internal();
        let bucket_count = res.get_bucket_count();
        if bucket_count > u64::from(limits.get_bucket_limit()) {
            return Err(FiltrateError::AggregationError(
                AggregationError::BucketLimitExceeded {
                    limit: limits.get_bucket_limit(),
                    current: u32::try_from(bucket_count).unwrap_or(u32::MAX),
                },
            ));
        }
        Ok(res)
    }

    pub(crate) fn into_final_result_internal(self) -> AggregationResults {
        AggregationResults(
            self.aggs
                .into_iter()
                .map(|(name, result)| (name, result.into_final_result()))
                .collect(),
        )
    }

    /// Merge another intermediate aggregation result into this result.
    ///
    /// Both trees have to come from the same request: aggregations are matched by position
    /// and their names have to agree.
    pub fn merge_fruits(&mut self, other: IntermediateAggregationResults) -> crate::Result<()> {
        if other.aggs.is_empty() {
            return Ok(());
        }
        if self.aggs.is_empty() {
            *self = other;
            return Ok(());
        }
        if self.aggs.len() != other.aggs.len() {
            return Err(FiltrateError::InvalidArgument(format!(
                "Cannot merge aggregation trees of different shapes: {:?} vs {:?}",
                self.aggs.keys().collect::<Vec<_>>(),
                other.aggs.keys().collect::<Vec<_>>()
            )));
        }
        let left_keys: Vec<String> = self.aggs.keys().map(str::to_string).collect();
        for ((left_name, left), (right_name, right)) in left_keys
            .iter()
            .zip(self.aggs.values_mut())
            .zip(other.aggs.into_iter())
        {
            if *left_name != right_name {
                return Err(FiltrateError::InvalidArgument(format!(
                    "Cannot merge aggregation {left_name} with aggregation {right_name}"
                )));
            }
            left.merge_fruits(right)?;
        }
        Ok(())
    }
}

/// An aggregation is either a bucket or a metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum IntermediateAggregationResult {
    /// Filters bucket aggregation.
    Filters(IntermediateFiltersResult),
    /// Stats metric aggregation.
    Stats(IntermediateStats),
}

impl IntermediateAggregationResult {
    pub(crate) fn into_final_result(self) -> AggregationResult {
        match self {
            IntermediateAggregationResult::Filters(filters) => {
                AggregationResult::Filters(filters.into_final_result())
            }
            IntermediateAggregationResult::Stats(stats) => {
                AggregationResult::Stats(stats.finalize())
            }
        }
    }

    fn merge_fruits(&mut self, other: IntermediateAggregationResult) -> crate::Result<()> {
        match (self, other) {
            (
                IntermediateAggregationResult::Filters(left),
                IntermediateAggregationResult::Filters(right),
            ) => left.merge_fruits(right),
            (
                IntermediateAggregationResult::Stats(left),
                IntermediateAggregationResult::Stats(right),
            ) => {
                left.merge_fruits(right);
                Ok(())
            }
            (left, right) => Err(FiltrateError::InvalidArgument(format!(
                "Cannot merge aggregation results of different types: {left:?} and {right:?}"
            ))),
        }
    }
}

/// Intermediate result of a filters aggregation for one owning bucket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntermediateFiltersResult {
    /// The buckets in declared order, the "other" bucket last.
    pub buckets: Vec<IntermediateFiltersBucket>,
    /// Whether the buckets are presented as an object keyed by the filter key.
    pub keyed: bool,
}

impl IntermediateFiltersResult {
    pub(crate) fn into_final_result(self) -> FiltersResult {
        let entries = self.buckets.into_iter().map(|bucket| {
            let sub_aggregation = bucket.sub_aggregation.into_final_result_internal();
            (bucket.key, bucket.doc_count, sub_aggregation)
        });
        let buckets = if self.keyed {
            BucketEntries::Keyed(
                entries
                    .map(|(key, doc_count, sub_aggregation)| {
                        let entry = FiltersBucketEntry {
                            key: None,
                            doc_count,
                            sub_aggregation,
                        };
                        (key, entry)
                    })
                    .collect(),
            )
        } else {
            BucketEntries::Vec(
                entries
                    .map(|(key, doc_count, sub_aggregation)| FiltersBucketEntry {
                        key: Some(key),
                        doc_count,
                        sub_aggregation,
                    })
                    .collect(),
            )
        };
        FiltersResult { buckets }
    }

    /// Merges the buckets of `other` into `self`, position by position.
    ///
    /// A result built without segment lacks the "other" bucket, so a single trailing bucket
    /// present on one side only is merged with zero. The buckets of `self` are left untouched
    /// when the bucket lists do not line up.
    pub fn merge_fruits(&mut self, other: IntermediateFiltersResult) -> crate::Result<()> {
        if self.buckets.len().abs_diff(other.buckets.len()) > 1 {
            return Err(FiltrateError::InvalidArgument(format!(
                "Cannot merge a filters result of {} buckets with one of {} buckets",
                self.buckets.len(),
                other.buckets.len()
            )));
        }
        if let Some((left, right)) = self
            .buckets
            .iter()
            .zip(&other.buckets)
            .find(|(left, right)| left.key != right.key)
        {
            return Err(FiltrateError::InvalidArgument(format!(
                "Cannot merge filter bucket {} with filter bucket {}",
                left.key, right.key
            )));
        }
        let left_buckets = std::mem::take(&mut self.buckets);
        let mut merged = Vec::with_capacity(left_buckets.len().max(other.buckets.len()));
        for pair in left_buckets.into_iter().zip_longest(other.buckets) {
            match pair {
                EitherOrBoth::Both(mut left, right) => {
                    left.merge_fruits(right)?;
                    merged.push(left);
                }
                EitherOrBoth::Left(bucket) | EitherOrBoth::Right(bucket) => merged.push(bucket),
            }
        }
        self.buckets = merged;
        Ok(())
    }
}

/// A bucket of a filters aggregation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntermediateFiltersBucket {
    /// The filter key, or the key of the "other" bucket.
    pub key: String,
    /// The number of documents in the bucket.
    pub doc_count: u64,
    /// The sub-aggregations of the bucket.
    pub sub_aggregation: IntermediateAggregationResults,
}

impl IntermediateFiltersBucket {
    fn merge_fruits(&mut self, other: IntermediateFiltersBucket) -> crate::Result<()> {
        if self.key != other.key {
            return Err(FiltrateError::InvalidArgument(format!(
                "Cannot merge filter bucket {} with filter bucket {}",
                self.key, other.key
            )));
        }
        self.doc_count += other.doc_count;
        self.sub_aggregation.merge_fruits(other.sub_aggregation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(key: &str, doc_count: u64) -> IntermediateFiltersBucket {
        IntermediateFiltersBucket {
            key: key.to_string(),
            doc_count,
            sub_aggregation: IntermediateAggregationResults::default(),
        }
    }

    fn filters_tree(name: &str, buckets: Vec<IntermediateFiltersBucket>) -> IntermediateAggregationResults {
        let mut tree = IntermediateAggregationResults::default();
        tree.push(
            name.to_string(),
            IntermediateAggregationResult::Filters(IntermediateFiltersResult {
                buckets,
                keyed: false,
            }),
        );
        tree
    }

    fn doc_counts(tree: &IntermediateAggregationResults, name: &str) -> Vec<(String, u64)> {
        match tree.get(name) {
            Some(IntermediateAggregationResult::Filters(filters)) => filters
                .buckets
                .iter()
                .map(|bucket| (bucket.key.clone(), bucket.doc_count))
                .collect(),
            _ => panic!("expected a filters result"),
        }
    }

    #[test]
    fn test_merge_fruits_filters() {
        let mut left = filters_tree("f", vec![bucket("a", 1), bucket("b", 2)]);
        let right = filters_tree("f", vec![bucket("a", 10), bucket("b", 20)]);
        left.merge_fruits(right).unwrap();
        assert_eq!(
            doc_counts(&left, "f"),
            vec![("a".to_string(), 11), ("b".to_string(), 22)]
        );
    }

    #[test]
    fn test_merge_fruits_missing_other_bucket() {
        let mut empty_side = filters_tree("f", vec![bucket("a", 0)]);
        let full_side = filters_tree("f", vec![bucket("a", 3), bucket("_other_", 4)]);
        empty_side.merge_fruits(full_side.clone()).unwrap();
        assert_eq!(
            doc_counts(&empty_side, "f"),
            vec![("a".to_string(), 3), ("_other_".to_string(), 4)]
        );
        let mut full_side_left = full_side;
        full_side_left
            .merge_fruits(filters_tree("f", vec![bucket("a", 1)]))
            .unwrap();
        assert_eq!(
            doc_counts(&full_side_left, "f"),
            vec![("a".to_string(), 4), ("_other_".to_string(), 4)]
        );
    }

    #[test]
    fn test_merge_fruits_bucket_lists_not_lining_up() {
        let mut filters = IntermediateFiltersResult {
            buckets: vec![bucket("a", 1)],
            keyed: false,
        };
        let longer = IntermediateFiltersResult {
            buckets: vec![bucket("a", 1), bucket("b", 2), bucket("c", 3)],
            keyed: false,
        };
        assert!(matches!(
            filters.merge_fruits(longer),
            Err(FiltrateError::InvalidArgument(_))
        ));
        assert_eq!(filters.buckets, vec![bucket("a", 1)]);

        let mut filters = IntermediateFiltersResult {
            buckets: vec![bucket("a", 1), bucket("b", 2)],
            keyed: false,
        };
        let other_keys = IntermediateFiltersResult {
            buckets: vec![bucket("a", 5), bucket("c", 3)],
            keyed: false,
        };
        assert!(filters.merge_fruits(other_keys).is_err());
        assert_eq!(filters.buckets, vec![bucket("a", 1), bucket("b", 2)]);
    }

    #[test]
    fn test_merge_fruits_empty_tree() {
        let mut left = IntermediateAggregationResults::default();
        let right = filters_tree("f", vec![bucket("a", 1)]);
        left.merge_fruits(right.clone()).unwrap();
        assert_eq!(left, right);
        left.merge_fruits(IntermediateAggregationResults::default())
            .unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_merge_fruits_mismatch() {
        let mut left = filters_tree("f", vec![bucket("a", 1)]);
        assert!(left
            .clone()
            .merge_fruits(filters_tree("g", vec![bucket("a", 1)]))
            .is_err());
        assert!(left
            .clone()
            .merge_fruits(filters_tree("f", vec![bucket("b", 1)]))
            .is_err());
        let mut stats_tree = IntermediateAggregationResults::default();
        stats_tree.push(
            "f".to_string(),
            IntermediateAggregationResult::Stats(IntermediateStats::default()),
        );
        assert!(matches!(
            left.merge_fruits(stats_tree),
            Err(FiltrateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bucket_limit() {
        let tree = filters_tree("f", vec![bucket("a", 1), bucket("b", 2), bucket("c", 2)]);
        let limits = AggregationLimits::new(None, Some(2));
        let err = tree.clone().into_final_result(&limits).unwrap_err();
        assert!(matches!(
            err,
            FiltrateError::AggregationError(AggregationError::BucketLimitExceeded {
                limit: 2,
                current: 3
            })
        ));
        let limits = AggregationLimits::new(None, Some(3));
        assert!(tree.into_final_result(&limits).is_ok());
    }

    #[test]
    fn test_intermediate_json_roundtrip() {
        let tree = filters_tree("f", vec![bucket("a", 1), bucket("b", 2)]);
        let json = serde_json::to_string(&tree).unwrap();
        let tree_back: IntermediateAggregationResults = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, tree_back);
    }
}
