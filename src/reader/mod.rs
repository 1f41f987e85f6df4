//! Readers publishing point-in-time searchers.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::{Index, Searcher};

/// `IndexReader` is your entry point to read and search the index.
///
/// It controls when a new version of the index should be loaded and lends
/// you instances of `Searcher` for the last loaded version.
///
/// `IndexReader` just wraps an `Arc`.
#[derive(Clone)]
pub struct IndexReader {
    index: Index,
    searcher: Arc<ArcSwap<Searcher>>,
}

impl IndexReader {
    pub(crate) fn open(index: Index) -> crate::Result<IndexReader> {
        let searcher = Self::create_searcher(&index)?;
        Ok(IndexReader {
            index,
            searcher: Arc::new(ArcSwap::from_pointee(searcher)),
        })
    }

    fn create_searcher(index: &Index) -> crate::Result<Searcher> {
        let segment_readers = index.searchable_segment_readers()?;
        let searcher = Searcher::new(index.schema(), segment_readers);
        debug!(
            "Opened searcher generation {} over {} segments",
            searcher.generation().generation_id(),
            searcher.segment_readers().len()
        );
        Ok(searcher)
    }

    /// Accessor to the index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Update searchers so that they reflect the state of the last
    /// `.commit()`.
    ///
    /// The newly published searcher always gets a new generation, even when no commit
    /// happened since the last reload.
    pub fn reload(&self) -> crate::Result<()> {
        let searcher = Self::create_searcher(&self.index)?;
        self.searcher.store(Arc::new(searcher));
        Ok(())
    }

    /// Returns a searcher
    ///
    /// This method should be called every single time a search
    /// query is performed.
    ///
    /// The same searcher must be used for a given query, as it ensures
    /// the use of a consistent segment set.
    pub fn searcher(&self) -> Searcher {
        self.searcher.load().as_ref().clone()
    }
}
