#[allow(clippy::module_inception)]
mod term_query;

pub use self::term_query::TermQuery;

#[cfg(test)]
mod tests {
    use crate::collector::Count;
    use crate::query::{Query, TermQuery};
    use crate::schema::Schema;
    use crate::{FiltrateError, Index};

    fn create_index() -> crate::Result<Index> {
        let mut schema_builder = Schema::builder();
        let color = schema_builder.add_text_field("color");
        let size = schema_builder.add_u64_field("size");
        let index = Index::create_in_ram(schema_builder.build());
        let mut writer = index.writer();
        writer.add_document(doc!(color => "red", size => 1u64))?;
        writer.add_document(doc!(color => "blue", size => 2u64))?;
        writer.commit()?;
        writer.add_document(doc!(color => "red"))?;
        writer.add_document(doc!(size => 2u64))?;
        writer.commit()?;
        Ok(index)
    }

    #[test]
    fn test_term_query_text() -> crate::Result<()> {
        let searcher = create_index()?.reader()?.searcher();
        assert_eq!(searcher.search(&TermQuery::new("color", "red"), &Count)?, 2);
        assert_eq!(TermQuery::new("color", "blue").count(&searcher)?, 1);
        assert_eq!(TermQuery::new("color", "green").count(&searcher)?, 0);
        Ok(())
    }

    #[test]
    fn test_term_query_u64() -> crate::Result<()> {
        let searcher = create_index()?.reader()?.searcher();
        assert_eq!(TermQuery::new("size", 2u64).count(&searcher)?, 2);
        Ok(())
    }

    #[test]
    fn test_term_query_type_mismatch() -> crate::Result<()> {
        let searcher = create_index()?.reader()?.searcher();
        let err = TermQuery::new("size", "2").weight(&searcher).err().unwrap();
        assert!(matches!(err, FiltrateError::SchemaError(_)));
        let err = TermQuery::new("weight", 2u64).weight(&searcher).err().unwrap();
        assert!(matches!(err, FiltrateError::SchemaError(_)));
        Ok(())
    }
}
