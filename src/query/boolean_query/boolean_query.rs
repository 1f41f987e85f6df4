use super::boolean_weight::BooleanWeight;
use crate::query::{AllQuery, Occur, Query, Weight};
use crate::Searcher;

/// The boolean query returns a set of documents
/// that matches the Boolean combination of constituent subqueries.
///
/// The documents matched by the boolean query are
/// those which
/// * match all of the sub queries associated with the
///   `Must` occurrence
/// * match none of the sub queries associated with the
///   `MustNot` occurrence.
/// * match at least one of the sub queries associated
///   with the `Must` or `Should` occurrence.
///
/// `Should` clauses only matter when there is no `Must` clause. A query made only of
/// `MustNot` clauses matches all of the other documents. A query without any clause
/// matches nothing.
///
/// ```rust
/// use filtrate::collector::Count;
/// use filtrate::query::{BooleanQuery, Occur, Query, RangeQuery, TermQuery};
/// use filtrate::schema::Schema;
/// use filtrate::{doc, Index};
///
/// # fn test() -> filtrate::Result<()> {
/// let mut schema_builder = Schema::builder();
/// let title = schema_builder.add_text_field("title");
/// let year = schema_builder.add_u64_field("year");
/// let schema = schema_builder.build();
/// let index = Index::create_in_ram(schema);
/// let mut index_writer = index.writer();
/// index_writer.add_document(doc!(title => "Dune", year => 1965u64))?;
/// index_writer.add_document(doc!(title => "Neuromancer", year => 1984u64))?;
/// index_writer.add_document(doc!(title => "Hyperion", year => 1989u64))?;
/// index_writer.commit()?;
/// let searcher = index.reader()?.searcher();
///
/// let query = BooleanQuery::new(vec![
///     (Occur::Must, Box::new(RangeQuery::new_u64("year", 1980..1990)) as Box<dyn Query>),
///     (Occur::MustNot, Box::new(TermQuery::new("title", "Hyperion"))),
/// ]);
/// assert_eq!(searcher.search(&query, &Count)?, 1);
/// # Ok(())
/// # }
/// # assert!(test().is_ok());
/// ```
#[derive(Debug)]
pub struct BooleanQuery {
    subqueries: Vec<(Occur, Box<dyn Query>)>,
}

impl Clone for BooleanQuery {
    fn clone(&self) -> Self {
        self.subqueries
            .iter()
            .map(|(occur, subquery)| (*occur, subquery.box_clone()))
            .collect::<Vec<_>>()
            .into()
    }
}

impl From<Vec<(Occur, Box<dyn Query>)>> for BooleanQuery {
    fn from(subqueries: Vec<(Occur, Box<dyn Query>)>) -> BooleanQuery {
        BooleanQuery::new(subqueries)
    }
}

impl Query for BooleanQuery {
    fn weight(&self, searcher: &Searcher) -> crate::Result<Box<dyn Weight>> {
        let mut matches_all = false;
        let mut sub_weights = Vec::with_capacity(self.subqueries.len());
        for (occur, subquery) in &self.subqueries {
            // `AllQuery` musts do not restrict the result.
            if *occur == Occur::Must && subquery.is::<AllQuery>() {
                matches_all = true;
                continue;
            }
            sub_weights.push((*occur, subquery.weight(searcher)?));
        }
        Ok(Box::new(BooleanWeight::new(sub_weights, matches_all)))
    }
}

impl BooleanQuery {
    /// Creates a new boolean query.
    pub fn new(subqueries: Vec<(Occur, Box<dyn Query>)>) -> BooleanQuery {
        BooleanQuery { subqueries }
    }

    /// Returns the intersection of the queries.
    pub fn intersection(queries: Vec<Box<dyn Query>>) -> BooleanQuery {
        let subqueries = queries.into_iter().map(|s| (Occur::Must, s)).collect();
        BooleanQuery::new(subqueries)
    }

    /// Returns the union of the queries.
    pub fn union(queries: Vec<Box<dyn Query>>) -> BooleanQuery {
        let subqueries = queries.into_iter().map(|s| (Occur::Should, s)).collect();
        BooleanQuery::new(subqueries)
    }

    /// Deconstructed view of the clauses making up this query.
    pub fn clauses(&self) -> &[(Occur, Box<dyn Query>)] {
        &self.subqueries[..]
    }
}
