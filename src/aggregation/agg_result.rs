//! Contains the final aggregation tree.
//!
//! This tree is computed from
//! [`IntermediateAggregationResults`](super::intermediate_agg_result::IntermediateAggregationResults)
//! via `into_final_result`. This conversion computes the final metrics, e.g. the average of a
//! stats aggregation out of its sum and count.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::metric::Stats;

/// The final aggregation result, in request order.
///
/// It serializes as a JSON object keyed by the aggregation names.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct AggregationResults(pub Vec<(String, AggregationResult)>);

impl AggregationResults {
    /// Returns the result of the aggregation named `name`.
    pub fn get(&self, name: &str) -> Option<&AggregationResult> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, result)| result)
    }

    /// Number of buckets in the tree, nested buckets included.
    pub fn get_bucket_count(&self) -> u64 {
        self.0
            .iter()
            .map(|(_, result)| result.get_bucket_count())
            .sum()
    }
}

impl Serialize for AggregationResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, result) in &self.0 {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

/// An aggregation is either a bucket or a metric.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregationResult {
    /// Filters bucket result.
    Filters(FiltersResult),
    /// Stats metric result.
    Stats(Stats),
}

impl AggregationResult {
    fn get_bucket_count(&self) -> u64 {
        match self {
            AggregationResult::Filters(filters) => filters.get_bucket_count(),
            AggregationResult::Stats(_) => 0,
        }
    }
}

/// The result of a filters aggregation.
///
/// # JSON Format
/// ```json
/// {
///   ...
///     "my_filters": {
///       "buckets": [
///         { "key": "errors", "doc_count": 5 },
///         { "key": "warnings", "doc_count": 2 },
///         { "key": "_other_", "doc_count": 3 }
///       ]
///    }
///    ...
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FiltersResult {
    /// The buckets, in the order of the filters. The "other" bucket comes last.
    pub buckets: BucketEntries<FiltersBucketEntry>,
}

impl FiltersResult {
    /// Iterates over the buckets and their keys, in order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, &FiltersBucketEntry)> + '_> {
        match &self.buckets {
            BucketEntries::Vec(entries) => Box::new(
                entries
                    .iter()
                    .map(|entry| (entry.key.as_deref().unwrap_or_default(), entry)),
            ),
            BucketEntries::Keyed(entries) => {
                Box::new(entries.iter().map(|(key, entry)| (key.as_str(), entry)))
            }
        }
    }

    /// Returns the bucket with the given key.
    pub fn get(&self, key: &str) -> Option<&FiltersBucketEntry> {
        self.iter()
            .find(|(bucket_key, _)| *bucket_key == key)
            .map(|(_, entry)| entry)
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        match &self.buckets {
            BucketEntries::Vec(entries) => entries.len(),
            BucketEntries::Keyed(entries) => entries.len(),
        }
    }

    fn get_bucket_count(&self) -> u64 {
        self.iter()
            .map(|(_, entry)| 1 + entry.sub_aggregation.get_bucket_count())
            .sum()
    }
}

/// A list of buckets, either as an array or as an object keyed by the bucket key.
#[derive(Clone, Debug, PartialEq)]
pub enum BucketEntries<T> {
    /// Vector format bucket entries
    Vec(Vec<T>),
    /// Keyed format bucket entries, in bucket order.
    Keyed(Vec<(String, T)>),
}

impl<T: Serialize> Serialize for BucketEntries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BucketEntries::Vec(entries) => entries.serialize(serializer),
            BucketEntries::Keyed(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, entry) in entries {
                    map.serialize_entry(key, entry)?;
                }
                map.end()
            }
        }
    }
}

/// A bucket of a filters aggregation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FiltersBucketEntry {
    /// The key of the bucket. Omitted in keyed responses, where it is the object key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Number of documents in the bucket.
    pub doc_count: u64,
    #[serde(flatten)]
    /// sub-aggregations in this bucket.
    pub sub_aggregation: AggregationResults,
}
