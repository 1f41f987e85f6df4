use std::fmt;

use crate::query::{Query, VecDocSet, Weight};
use crate::schema::{Field, OwnedValue};
use crate::{DocId, DocSet, FiltrateError, Searcher, SegmentReader};

/// A Term query matches all of the documents
/// whose field holds exactly the given value.
///
/// The value type must match the type of the field: a `u64` field can only be
/// queried with a `u64` value. The check happens when the query is compiled into
/// a [`Weight`].
///
/// ```rust
/// use filtrate::collector::Count;
/// use filtrate::query::TermQuery;
/// use filtrate::schema::Schema;
/// use filtrate::{doc, Index};
/// # fn test() -> filtrate::Result<()> {
/// let mut schema_builder = Schema::builder();
/// let title = schema_builder.add_text_field("title");
/// let schema = schema_builder.build();
/// let index = Index::create_in_ram(schema);
/// let mut index_writer = index.writer();
/// index_writer.add_document(doc!(title => "The Name of the Wind"))?;
/// index_writer.add_document(doc!(title => "A Dairy Cow"))?;
/// index_writer.commit()?;
/// let searcher = index.reader()?.searcher();
/// let query = TermQuery::new("title", "A Dairy Cow");
/// let count = searcher.search(&query, &Count)?;
/// assert_eq!(count, 1);
/// # Ok(())
/// # }
/// # assert!(test().is_ok());
/// ```
#[derive(Clone)]
pub struct TermQuery {
    field_name: String,
    value: OwnedValue,
}

impl fmt::Debug for TermQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TermQuery({}:{:?})", self.field_name, self.value)
    }
}

impl TermQuery {
    /// Creates a new term query.
    pub fn new(field_name: impl Into<String>, value: impl Into<OwnedValue>) -> TermQuery {
        TermQuery {
            field_name: field_name.into(),
            value: value.into(),
        }
    }

    /// The name of the field targeted by the query.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The value looked for.
    pub fn value(&self) -> &OwnedValue {
        &self.value
    }
}

impl Query for TermQuery {
    fn weight(&self, searcher: &Searcher) -> crate::Result<Box<dyn Weight>> {
        let schema = searcher.schema();
        let field = schema.get_field(&self.field_name)?;
        let field_type = schema.get_field_entry(field).field_type();
        if field_type != self.value.value_type() {
            return Err(FiltrateError::SchemaError(format!(
                "Field {} is of type {field_type}, it cannot be queried with {:?}",
                self.field_name, self.value
            )));
        }
        Ok(Box::new(TermWeight {
            field,
            value: self.value.clone(),
        }))
    }
}

struct TermWeight {
    field: Field,
    value: OwnedValue,
}

impl Weight for TermWeight {
    fn scorer(&self, reader: &SegmentReader) -> crate::Result<Box<dyn DocSet>> {
        let doc_ids: Vec<DocId> = reader
            .column(self.field)
            .iter()
            .enumerate()
            .filter(|(_, value_opt)| value_opt.as_ref() == Some(&self.value))
            .map(|(doc, _)| doc as DocId)
            .collect();
        Ok(Box::new(VecDocSet::from(doc_ids)))
    }
}
