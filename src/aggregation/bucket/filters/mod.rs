//! The filters aggregation.
//!
//! A [`FiltersAggregation`] is the request, a [`FiltersAggregatorFactory`] compiles its filters
//! once per searcher generation and creates the per segment [`FiltersAggregator`]s, which
//! test every document against one [`SegmentMatcher`] per filter.

mod aggregator;
mod factory;
mod matcher;

use std::fmt;

use rustc_hash::FxHashSet;

pub use self::aggregator::FiltersAggregator;
pub use self::factory::{CompiledFilters, FiltersAggregatorFactory};
pub use self::matcher::SegmentMatcher;
use crate::query::Query;
use crate::FiltrateError;

/// The key of the "other" bucket when none is given.
pub const DEFAULT_OTHER_BUCKET_KEY: &str = "_other_";

/// A multi-bucket aggregation where each bucket holds the documents matching a filter.
///
/// Filters are not mutually exclusive: a document matching several filters is counted in
/// each of their buckets. Documents matching no filter are dropped, unless an "other" bucket
/// is configured, which then collects them.
///
/// Buckets are returned in the order the filters were declared, the "other" bucket last.
///
/// # Result
/// ```json
/// {
///   "messages": {
///     "buckets": [
///       { "key": "errors", "doc_count": 1 },
///       { "key": "warnings", "doc_count": 2 },
///       { "key": "_other_", "doc_count": 3 }
///     ]
///   }
/// }
/// ```
/// With `keyed`, `buckets` is an object from the bucket key to the bucket.
///
/// # Example
/// ```
/// use filtrate::aggregation::bucket::FiltersAggregation;
/// use filtrate::query::{RangeQuery, TermQuery};
///
/// let filters = FiltersAggregation::new()
///     .filter("errors", TermQuery::new("level", "error"))
///     .filter("slow", RangeQuery::new_u64("latency_ms", 1_000..u64::MAX))
///     .other_bucket_key("everything_else")
///     .keyed(true);
/// assert_eq!(filters.keys().collect::<Vec<_>>(), vec!["errors", "slow"]);
/// assert_eq!(filters.get_other_bucket_key(), Some("everything_else"));
/// ```
#[derive(Debug, Default)]
pub struct FiltersAggregation {
    filters: Vec<(String, Box<dyn Query>)>,
    keyed: bool,
    other_bucket_key: Option<String>,
}

impl Clone for FiltersAggregation {
    fn clone(&self) -> Self {
        FiltersAggregation {
            filters: self
                .filters
                .iter()
                .map(|(key, query)| (key.clone(), query.box_clone()))
                .collect(),
            keyed: self.keyed,
            other_bucket_key: self.other_bucket_key.clone(),
        }
    }
}

impl FiltersAggregation {
    /// Creates an aggregation without filters.
    pub fn new() -> FiltersAggregation {
        FiltersAggregation::default()
    }

    /// Creates an aggregation whose buckets are keyed by the position of their filter,
    /// `"0"`, `"1"`, ...
    pub fn anonymous(queries: Vec<Box<dyn Query>>) -> FiltersAggregation {
        FiltersAggregation {
            filters: queries
                .into_iter()
                .enumerate()
                .map(|(pos, query)| (pos.to_string(), query))
                .collect(),
            keyed: false,
            other_bucket_key: None,
        }
    }

    /// Appends a filter. Its bucket is placed after the buckets of the filters already added.
    pub fn filter(mut self, key: impl Into<String>, query: impl Query) -> FiltersAggregation {
        self.filters.push((key.into(), Box::new(query)));
        self
    }

    /// Presents the buckets as an object keyed by the bucket key.
    pub fn keyed(mut self, keyed: bool) -> FiltersAggregation {
        self.keyed = keyed;
        self
    }

    /// Collects the documents matching no filter into a bucket named `key`.
    pub fn other_bucket_key(mut self, key: impl Into<String>) -> FiltersAggregation {
        self.other_bucket_key = Some(key.into());
        self
    }

    /// Collects the documents matching no filter into a bucket named
    /// [`DEFAULT_OTHER_BUCKET_KEY`].
    pub fn with_other_bucket(self) -> FiltersAggregation {
        self.other_bucket_key(DEFAULT_OTHER_BUCKET_KEY)
    }

    /// The filters, in declared order.
    pub fn filters(&self) -> &[(String, Box<dyn Query>)] {
        &self.filters
    }

    /// The filter keys, in declared order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.filters.iter().map(|(key, _)| key.as_str())
    }

    /// Whether the buckets are presented keyed.
    pub fn is_keyed(&self) -> bool {
        self.keyed
    }

    /// The key of the "other" bucket, if there is one.
    pub fn get_other_bucket_key(&self) -> Option<&str> {
        self.other_bucket_key.as_deref()
    }

    /// Checks that the buckets of a keyed aggregation have distinct keys.
    ///
    /// Unkeyed aggregations accept duplicate keys: their buckets stay apart by position.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.keyed {
            return Ok(());
        }
        let mut keys = FxHashSet::default();
        for key in self.keys().chain(self.get_other_bucket_key()) {
            if !keys.insert(key) {
                return Err(FiltrateError::InvalidArgument(format!(
                    "Duplicate bucket key {key:?} in filters aggregation"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Vec<(String, Box<dyn Query>)>, bool, Option<String>) {
        (self.filters, self.keyed, self.other_bucket_key)
    }
}

impl fmt::Display for FiltersAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filters[{}]", self.keys().collect::<Vec<_>>().join(", "))?;
        if let Some(other_bucket_key) = self.get_other_bucket_key() {
            write!(f, " other={other_bucket_key}")?;
        }
        Ok(())
    }
}
