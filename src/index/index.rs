use std::fmt;
use std::sync::{Arc, RwLock};

use crate::indexer::IndexWriter;
use crate::reader::IndexReader;
use crate::schema::{OwnedValue, Schema};
use crate::{DocId, SegmentOrdinal, SegmentReader};

/// An immutable set of documents, stored column by column.
#[derive(Clone)]
pub(crate) struct SealedSegment {
    max_doc: DocId,
    columns: Arc<[Vec<Option<OwnedValue>>]>,
}

impl SealedSegment {
    pub(crate) fn new(max_doc: DocId, columns: Vec<Vec<Option<OwnedValue>>>) -> SealedSegment {
        debug_assert!(columns
            .iter()
            .all(|column| column.len() == max_doc as usize));
        SealedSegment {
            max_doc,
            columns: columns.into(),
        }
    }

    fn open_reader(&self, segment_ord: SegmentOrdinal, schema: &Schema) -> SegmentReader {
        SegmentReader::new(segment_ord, self.max_doc, schema.clone(), self.columns.clone())
    }
}

/// Search Index
///
/// The index lives entirely in RAM. Documents are added through an [`IndexWriter`] and
/// become searchable once committed, each commit sealing a new segment.
#[derive(Clone)]
pub struct Index {
    schema: Schema,
    segments: Arc<RwLock<Vec<SealedSegment>>>,
}

impl Index {
    /// Creates a new index using the `RamDirectory`.
    ///
    /// The index will be allocated in anonymous memory.
    /// This is useful for indexing small set of documents
    /// for instances like unit test or temporary in memory index.
    pub fn create_in_ram(schema: Schema) -> Index {
        Index {
            schema,
            segments: Arc::default(),
        }
    }

    /// Accessor for the index schema
    pub fn schema(&self) -> Schema {
        self.schema.clone()
    }

    /// Creates a new writer for the index.
    pub fn writer(&self) -> IndexWriter {
        IndexWriter::new(self.clone())
    }

    /// Create a `IndexReader` for the given index.
    ///
    /// The reader starts with a searcher over the segments committed so far.
    pub fn reader(&self) -> crate::Result<IndexReader> {
        IndexReader::open(self.clone())
    }

    /// Returns the number of committed segments.
    pub fn num_segments(&self) -> crate::Result<usize> {
        Ok(self.segments.read()?.len())
    }

    pub(crate) fn add_segment(&self, segment: SealedSegment) -> crate::Result<()> {
        self.segments.write()?.push(segment);
        Ok(())
    }

    /// Opens a reader for each of the committed segments.
    pub(crate) fn searchable_segment_readers(&self) -> crate::Result<Vec<SegmentReader>> {
        let segments = self.segments.read()?;
        Ok(segments
            .iter()
            .enumerate()
            .map(|(segment_ord, segment)| segment.open_reader(segment_ord as SegmentOrdinal, &self.schema))
            .collect())
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({:?})", self.schema)
    }
}
