use crate::query::{BitSetDocSet, Query, Weight};
use crate::schema::Field;
use crate::{BitSet, DocId, DocSet, Searcher, SegmentReader};

/// Query that matches all documents with a non-null value in the specified field.
#[derive(Clone, Debug)]
pub struct ExistsQuery {
    field_name: String,
}

impl ExistsQuery {
    /// Creates a new `ExistQuery` from the given field.
    ///
    /// This query matches all documents with at least one non-null value in the specified
    /// field. The field has to exist in the schema of the searcher the query is compiled
    /// against.
    pub fn new(field_name: impl Into<String>) -> Self {
        ExistsQuery {
            field_name: field_name.into(),
        }
    }
}

impl Query for ExistsQuery {
    fn weight(&self, searcher: &Searcher) -> crate::Result<Box<dyn Weight>> {
        let field = searcher.schema().get_field(&self.field_name)?;
        Ok(Box::new(ExistsWeight { field }))
    }
}

/// Weight associated with the `ExistsQuery` query.
pub struct ExistsWeight {
    field: Field,
}

impl Weight for ExistsWeight {
    fn scorer(&self, reader: &SegmentReader) -> crate::Result<Box<dyn DocSet>> {
        let mut doc_bitset = BitSet::with_max_value(reader.max_doc());
        for (doc, value_opt) in reader.column(self.field).iter().enumerate() {
            if value_opt.is_some() {
                doc_bitset.insert(doc as DocId);
            }
        }
        Ok(Box::new(BitSetDocSet::from(doc_bitset)))
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{ExistsQuery, Query};
    use crate::schema::Schema;
    use crate::{FiltrateError, Index};

    #[test]
    fn test_exists_query_simple() -> crate::Result<()> {
        let mut schema_builder = Schema::builder();
        let all_field = schema_builder.add_u64_field("all");
        let even_field = schema_builder.add_u64_field("even");
        let index = Index::create_in_ram(schema_builder.build());
        let mut writer = index.writer();
        for i in 0u64..100u64 {
            if i % 2 == 0 {
                writer.add_document(doc!(all_field => i, even_field => i))?;
            } else {
                writer.add_document(doc!(all_field => i))?;
            }
        }
        writer.commit()?;
        let searcher = index.reader()?.searcher();
        assert_eq!(ExistsQuery::new("all").count(&searcher)?, 100);
        assert_eq!(ExistsQuery::new("even").count(&searcher)?, 50);
        Ok(())
    }

    #[test]
    fn test_exists_query_unknown_field() -> crate::Result<()> {
        let index = Index::create_in_ram(Schema::builder().build());
        let searcher = index.reader()?.searcher();
        let err = ExistsQuery::new("not_a_field").weight(&searcher).err().unwrap();
        assert!(matches!(err, FiltrateError::SchemaError(_)));
        Ok(())
    }
}
