use crate::docset::{DocSet, TERMINATED};
use crate::query::{Query, Weight};
use crate::{DocId, Searcher, SegmentReader};

/// `EmptyQuery` is a dummy `Query` in which no document matches.
///
/// It is useful for tests and handling edge cases.
#[derive(Clone, Debug)]
pub struct EmptyQuery;

impl Query for EmptyQuery {
    fn weight(&self, _searcher: &Searcher) -> crate::Result<Box<dyn Weight>> {
        Ok(Box::new(EmptyWeight))
    }

    fn count(&self, _searcher: &Searcher) -> crate::Result<usize> {
        Ok(0)
    }
}

/// `EmptyWeight` is a dummy `Weight` in which no document matches.
///
/// It is useful for tests and handling edge cases.
pub struct EmptyWeight;

impl Weight for EmptyWeight {
    fn scorer(&self, _reader: &SegmentReader) -> crate::Result<Box<dyn DocSet>> {
        Ok(Box::new(EmptyScorer))
    }

    fn count(&self, _reader: &SegmentReader) -> crate::Result<u32> {
        Ok(0)
    }
}

/// `EmptyScorer` is a dummy `DocSet` in which no document matches.
///
/// It is useful for tests and handling edge cases.
pub struct EmptyScorer;

impl DocSet for EmptyScorer {
    fn advance(&mut self) -> DocId {
        TERMINATED
    }

    fn doc(&self) -> DocId {
        TERMINATED
    }

    fn size_hint(&self) -> u32 {
        0
    }
}
