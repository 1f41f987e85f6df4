use crate::index::SealedSegment;
use crate::schema::{Document, OwnedValue};
use crate::{DocId, FiltrateError, Index};

/// `IndexWriter` is the user entry-point to add documents to an index.
///
/// Added documents are buffered until [`IndexWriter::commit`] seals them into a new
/// segment.
pub struct IndexWriter {
    index: Index,
    pending_docs: Vec<Document>,
}

impl IndexWriter {
    pub(crate) fn new(index: Index) -> IndexWriter {
        IndexWriter {
            index,
            pending_docs: Vec::new(),
        }
    }

    /// Accessor to the index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Adds a document.
    ///
    /// The document is validated against the schema: every field must belong to the
    /// schema and every value must match the type of its field.
    ///
    /// The document is not visible to searchers until the next commit.
    pub fn add_document(&mut self, document: Document) -> crate::Result<()> {
        let schema = self.index.schema();
        for (field, value) in document.field_values() {
            if field.field_id() as usize >= schema.num_fields() {
                return Err(FiltrateError::SchemaError(format!(
                    "Field {} is not declared in the schema",
                    field.field_id()
                )));
            }
            let field_entry = schema.get_field_entry(field);
            if value.value_type() != field_entry.field_type() {
                return Err(FiltrateError::SchemaError(format!(
                    "Expected a {} value for field {}, got {:?}",
                    field_entry.field_type(),
                    field_entry.name(),
                    value
                )));
            }
        }
        self.pending_docs.push(document);
        Ok(())
    }

    /// Returns the number of documents waiting for the next commit.
    pub fn num_pending_docs(&self) -> usize {
        self.pending_docs.len()
    }

    /// Commits all of the pending changes
    ///
    /// The pending documents are sealed into a new segment. Committing without pending
    /// documents is a no-op.
    ///
    /// Searchers opened before the commit do not see the new segment: the reader needs to
    /// be reloaded.
    pub fn commit(&mut self) -> crate::Result<()> {
        if self.pending_docs.is_empty() {
            return Ok(());
        }
        let docs = std::mem::take(&mut self.pending_docs);
        let max_doc = DocId::try_from(docs.len()).map_err(|_| {
            FiltrateError::InvalidArgument(format!("Too many documents in segment: {}", docs.len()))
        })?;
        let num_fields = self.index.schema().num_fields();
        let mut columns: Vec<Vec<Option<OwnedValue>>> = vec![vec![None; docs.len()]; num_fields];
        for (doc_id, doc) in docs.into_iter().enumerate() {
            for (field, value) in doc.field_values() {
                let slot = &mut columns[field.field_id() as usize][doc_id];
                if slot.is_none() {
                    *slot = Some(value.clone());
                }
            }
        }
        self.index.add_segment(SealedSegment::new(max_doc, columns))?;
        info!("Committed segment with {max_doc} docs");
        Ok(())
    }
}
