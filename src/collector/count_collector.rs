use super::Collector;
use crate::query::Weight;
use crate::{Searcher, SegmentReader};

/// `CountCollector` collector only counts how many
/// documents match the query.
///
/// ```rust
/// use filtrate::collector::Count;
/// use filtrate::query::TermQuery;
/// use filtrate::schema::Schema;
/// use filtrate::{doc, Index};
///
/// let mut schema_builder = Schema::builder();
/// let title = schema_builder.add_text_field("title");
/// let schema = schema_builder.build();
/// let index = Index::create_in_ram(schema);
///
/// let mut index_writer = index.writer();
/// index_writer.add_document(doc!(title => "The Name of the Wind")).unwrap();
/// index_writer.add_document(doc!(title => "The Diary of Muadib")).unwrap();
/// index_writer.add_document(doc!(title => "The Diary of Muadib")).unwrap();
/// assert!(index_writer.commit().is_ok());
///
/// let reader = index.reader().unwrap();
/// let searcher = reader.searcher();
///
/// let query = TermQuery::new("title", "The Diary of Muadib");
/// let count = searcher.search(&query, &Count).unwrap();
///
/// assert_eq!(count, 2);
/// ```
pub struct Count;

impl Collector for Count {
    type Fruit = usize;

    type SegmentFruit = usize;

    fn collect_segment(
        &self,
        _searcher: &Searcher,
        weight: &dyn Weight,
        segment_reader: &SegmentReader,
    ) -> crate::Result<usize> {
        Ok(weight.count(segment_reader)? as usize)
    }

    fn merge_fruits(&self, _searcher: &Searcher, segment_counts: Vec<usize>) -> crate::Result<usize> {
        Ok(segment_counts.into_iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::Count;
    use crate::query::{AllQuery, EmptyQuery};
    use crate::schema::Schema;
    use crate::{Executor, Index};

    #[test]
    fn test_count_collect_does_not_requires_scoring() -> crate::Result<()> {
        let mut schema_builder = Schema::builder();
        let val = schema_builder.add_u64_field("val");
        let index = Index::create_in_ram(schema_builder.build());
        let mut writer = index.writer();
        for i in 0..10u64 {
            writer.add_document(doc!(val => i))?;
            if i % 4 == 3 {
                writer.commit()?;
            }
        }
        writer.commit()?;
        let searcher = index.reader()?.searcher();
        assert_eq!(searcher.segment_readers().len(), 3);
        assert_eq!(searcher.search(&AllQuery, &Count)?, 10);
        assert_eq!(searcher.search(&EmptyQuery, &Count)?, 0);
        let executor = Executor::multi_thread(2, "count-test")?;
        assert_eq!(searcher.search_with_executor(&AllQuery, &Count, &executor)?, 10);
        Ok(())
    }

    #[test]
    fn test_count_no_segments() -> crate::Result<()> {
        let index = Index::create_in_ram(Schema::builder().build());
        let searcher = index.reader()?.searcher();
        assert_eq!(searcher.search(&AllQuery, &Count)?, 0);
        Ok(())
    }
}
