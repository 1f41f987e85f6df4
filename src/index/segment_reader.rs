use std::fmt;
use std::sync::Arc;

use crate::schema::{Field, OwnedValue, Schema};
use crate::{DocId, SegmentOrdinal};

/// Entry point to access all of the datastructures of a `Segment`
///
/// Each field is exposed as a column holding the first value of the field for every
/// document of the segment.
///
/// `SegmentReader`s are cheap to clone.
#[derive(Clone)]
pub struct SegmentReader {
    segment_ord: SegmentOrdinal,
    max_doc: DocId,
    schema: Schema,
    columns: Arc<[Vec<Option<OwnedValue>>]>,
}

impl SegmentReader {
    pub(crate) fn new(
        segment_ord: SegmentOrdinal,
        max_doc: DocId,
        schema: Schema,
        columns: Arc<[Vec<Option<OwnedValue>>]>,
    ) -> SegmentReader {
        SegmentReader {
            segment_ord,
            max_doc,
            schema,
            columns,
        }
    }

    /// Returns the ordinal of the segment within its searcher.
    pub fn segment_ord(&self) -> SegmentOrdinal {
        self.segment_ord
    }

    /// Returns the highest document id ever attributed in
    /// this segment + 1.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// Returns the schema of the index this segment belongs to.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the column of values of a field, indexed by `DocId`.
    pub fn column(&self, field: Field) -> &[Option<OwnedValue>] {
        self.columns
            .get(field.field_id() as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the value of `field` for the document `doc`, if any.
    pub fn value(&self, field: Field, doc: DocId) -> Option<&OwnedValue> {
        self.column(field).get(doc as usize)?.as_ref()
    }
}

impl fmt::Debug for SegmentReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentReader({}, max_doc={})", self.segment_ord, self.max_doc)
    }
}
