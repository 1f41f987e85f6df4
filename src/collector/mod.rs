//! # Collectors
//!
//! Collectors define the information you want to extract from the documents matching the
//! queries. In filtrate jargon, we call this information your search "fruit".
//!
//! A [`Collector`] is handed every segment of the [`Searcher`](crate::Searcher) along with
//! the compiled [`Weight`] of the query. It returns one segment fruit per segment, which
//! are then merged into the final fruit.
//!
//! Segments may be collected on different threads (see
//! [`Searcher::search_with_executor`](crate::Searcher::search_with_executor)), which is why
//! collectors are `Sync` and segment fruits are `Send`.
//!
//! The most useful collector is the
//! [`AggregationCollector`](crate::aggregation::AggregationCollector). [`Count`] simply counts
//! the matching documents.

use crate::query::Weight;
use crate::{Searcher, SegmentReader};

mod count_collector;
pub use self::count_collector::Count;

/// Collectors are in charge of collecting and retaining relevant
/// information from the document found and scored by the query.
pub trait Collector: Sync + Send {
    /// `Fruit` is the type for the result of our collection.
    type Fruit: Send;

    /// Type of the fruit produced for a single segment.
    type SegmentFruit: Send;

    /// Collects the documents of a single segment matching `weight`.
    fn collect_segment(
        &self,
        searcher: &Searcher,
        weight: &dyn Weight,
        segment_reader: &SegmentReader,
    ) -> crate::Result<Self::SegmentFruit>;

    /// Combines the fruit associated with the collection of each segments
    /// into one fruit.
    ///
    /// `segment_fruits` follows the order of the searcher's segments. It is empty when the
    /// searcher has no segment.
    fn merge_fruits(
        &self,
        searcher: &Searcher,
        segment_fruits: Vec<Self::SegmentFruit>,
    ) -> crate::Result<Self::Fruit>;
}
