use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::collector::Collector;
use crate::core::Executor;
use crate::query::Query;
use crate::schema::Schema;
use crate::{DocId, SegmentOrdinal, SegmentReader};

static NEXT_GENERATION_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a point-in-time view over an index.
///
/// Every [`Searcher`] gets a generation id that is unique within the process. Clones of a
/// searcher share it, while two searchers opened over the very same segments do not.
/// Caches built from a searcher are therefore keyed on the `generation_id`, never on the
/// content of the segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearcherGeneration {
    segments: Vec<DocId>,
    generation_id: u64,
}

impl SearcherGeneration {
    pub(crate) fn from_segment_readers(segment_readers: &[SegmentReader]) -> Self {
        let generation_id = NEXT_GENERATION_ID.fetch_add(1, Ordering::Relaxed);
        SearcherGeneration {
            segments: segment_readers
                .iter()
                .map(|segment_reader| segment_reader.max_doc())
                .collect(),
            generation_id,
        }
    }

    /// Returns the searcher generation id.
    pub fn generation_id(&self) -> u64 {
        self.generation_id
    }

    /// Returns the `max_doc` of each segment of the generation.
    pub fn segments(&self) -> &[DocId] {
        &self.segments
    }
}

struct SearcherInner {
    schema: Schema,
    segment_readers: Vec<SegmentReader>,
    generation: SearcherGeneration,
}

/// Holds a list of `SegmentReader`s ready for search.
///
/// It guarantees that the `Segment` will not be removed before
/// the destruction of the `Searcher`.
#[derive(Clone)]
pub struct Searcher {
    inner: Arc<SearcherInner>,
}

impl Searcher {
    /// Creates a new `Searcher` over the given segments, with a fresh generation.
    pub(crate) fn new(schema: Schema, segment_readers: Vec<SegmentReader>) -> Searcher {
        let generation = SearcherGeneration::from_segment_readers(&segment_readers);
        Searcher {
            inner: Arc::new(SearcherInner {
                schema,
                segment_readers,
                generation,
            }),
        }
    }

    /// Accessor to the `Searcher`'s generation.
    pub fn generation(&self) -> &SearcherGeneration {
        &self.inner.generation
    }

    /// Access the schema associated with the index of this searcher.
    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    /// Returns the overall number of documents in the index.
    pub fn num_docs(&self) -> u64 {
        self.inner
            .segment_readers
            .iter()
            .map(|segment_reader| u64::from(segment_reader.max_doc()))
            .sum::<u64>()
    }

    /// Return the list of segment readers
    pub fn segment_readers(&self) -> &[SegmentReader] {
        &self.inner.segment_readers
    }

    /// Returns the segment_reader associated with the given segment_ord
    pub fn segment_reader(&self, segment_ord: SegmentOrdinal) -> &SegmentReader {
        &self.inner.segment_readers[segment_ord as usize]
    }

    /// Runs a query on the segment readers wrapped by the searcher.
    ///
    /// Search works as follows :
    ///
    ///  First the weight object associated with the query is created.
    ///
    ///  Then, the query loops over the segments and for each segment :
    ///  - calls `collect_segment` on the collector.
    ///
    ///  Finally, the Collector merges each of the child collectors into itself for result
    ///  usability by the caller.
    pub fn search<C: Collector>(&self, query: &dyn Query, collector: &C) -> crate::Result<C::Fruit> {
        let executor = Executor::single_thread();
        self.search_with_executor(query, collector, &executor)
    }

    /// Same as [`search(...)`](Searcher::search) but multithreaded.
    ///
    /// The current implementation is rather naive :
    /// multithreading is by splitting search into as many task
    /// as there are segments.
    ///
    /// It is powerless at making search faster if your index consists in
    /// one large segment.
    ///
    /// Also, keep in my multithreading a single query on several
    /// threads will not improve your throughput. It can actually
    /// hurt it. It will however, decrease the average response time.
    pub fn search_with_executor<C: Collector>(
        &self,
        query: &dyn Query,
        collector: &C,
        executor: &Executor,
    ) -> crate::Result<C::Fruit> {
        let weight = query.weight(self)?;
        let segment_readers = self.segment_readers();
        let fruits = executor.map(
            |segment_reader| collector.collect_segment(self, weight.as_ref(), segment_reader),
            segment_readers.iter(),
        )?;
        collector.merge_fruits(self, fruits)
    }
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("generation_id", &self.inner.generation.generation_id())
            .field("segments", &self.inner.generation.segments())
            .finish()
    }
}
