#[allow(clippy::module_inception)]
mod boolean_query;
mod boolean_weight;

pub use self::boolean_query::BooleanQuery;

#[cfg(test)]
mod tests {
    use super::BooleanQuery;
    use crate::query::{AllQuery, EmptyQuery, Occur, Query, RangeQuery, TermQuery};
    use crate::schema::Schema;
    use crate::{Index, Searcher};

    fn searcher() -> crate::Result<Searcher> {
        let mut schema_builder = Schema::builder();
        let text = schema_builder.add_text_field("text");
        let num = schema_builder.add_u64_field("num");
        let index = Index::create_in_ram(schema_builder.build());
        let mut writer = index.writer();
        // docs 0..9, text "a" for even docs, "b" for odd docs.
        for i in 0..10u64 {
            let label = if i % 2 == 0 { "a" } else { "b" };
            writer.add_document(doc!(text => label, num => i))?;
            if i == 6 {
                writer.commit()?;
            }
        }
        writer.commit()?;
        Ok(index.reader()?.searcher())
    }

    fn term(value: &str) -> Box<dyn Query> {
        Box::new(TermQuery::new("text", value))
    }

    fn range(range: std::ops::Range<u64>) -> Box<dyn Query> {
        Box::new(RangeQuery::new_u64("num", range))
    }

    #[test]
    fn test_boolean_must() -> crate::Result<()> {
        let searcher = searcher()?;
        let query = BooleanQuery::new(vec![(Occur::Must, term("a")), (Occur::Must, range(0..5))]);
        assert_eq!(query.count(&searcher)?, 3);
        Ok(())
    }

    #[test]
    fn test_boolean_should() -> crate::Result<()> {
        let searcher = searcher()?;
        let query = BooleanQuery::union(vec![range(0..2), range(8..10), term("a")]);
        assert_eq!(query.count(&searcher)?, 7);
        Ok(())
    }

    #[test]
    fn test_boolean_should_ignored_with_must() -> crate::Result<()> {
        let searcher = searcher()?;
        let query = BooleanQuery::new(vec![
            (Occur::Must, term("b")),
            (Occur::Should, range(0..2)),
        ]);
        assert_eq!(query.count(&searcher)?, 5);
        Ok(())
    }

    #[test]
    fn test_boolean_must_not_only() -> crate::Result<()> {
        let searcher = searcher()?;
        let query = BooleanQuery::new(vec![(Occur::MustNot, term("a"))]);
        assert_eq!(query.count(&searcher)?, 5);
        let query = BooleanQuery::new(vec![
            (Occur::MustNot, term("a")),
            (Occur::MustNot, range(0..4)),
        ]);
        assert_eq!(query.count(&searcher)?, 3);
        Ok(())
    }

    #[test]
    fn test_boolean_all_query_clause() -> crate::Result<()> {
        let searcher = searcher()?;
        let query = BooleanQuery::intersection(vec![Box::new(AllQuery), range(3..6)]);
        assert_eq!(query.count(&searcher)?, 3);
        let query = BooleanQuery::new(vec![
            (Occur::Must, Box::new(AllQuery)),
            (Occur::MustNot, term("b")),
        ]);
        assert_eq!(query.count(&searcher)?, 5);
        Ok(())
    }

    #[test]
    fn test_boolean_empty() -> crate::Result<()> {
        let searcher = searcher()?;
        assert_eq!(BooleanQuery::new(Vec::new()).count(&searcher)?, 0);
        let query = BooleanQuery::intersection(vec![Box::new(EmptyQuery), term("a")]);
        assert_eq!(query.count(&searcher)?, 0);
        Ok(())
    }

    #[test]
    fn test_boolean_nested() -> crate::Result<()> {
        let searcher = searcher()?;
        let inner: Box<dyn Query> = Box::new(BooleanQuery::union(vec![range(0..2), range(8..10)]));
        let query = BooleanQuery::new(vec![(Occur::Must, inner), (Occur::MustNot, term("b"))]);
        assert_eq!(query.count(&searcher)?, 2);
        let cloned = query.clone();
        assert_eq!(cloned.clauses().len(), 2);
        assert_eq!(cloned.count(&searcher)?, 2);
        Ok(())
    }

    #[test]
    fn test_boolean_propagates_compilation_error() -> crate::Result<()> {
        let searcher = searcher()?;
        let query = BooleanQuery::union(vec![term("a"), Box::new(TermQuery::new("missing", "a"))]);
        assert!(query.weight(&searcher).is_err());
        Ok(())
    }
}
