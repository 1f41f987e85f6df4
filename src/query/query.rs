use std::fmt;

use downcast_rs::impl_downcast;

use super::Weight;
use crate::Searcher;

/// The `Query` trait defines a set of documents.
///
/// The `Query` trait is in charge of defining :
///
/// - a set of documents
/// - a way to compile it against a specific [`Searcher`]
///
/// Queries are in charge of checking the fields and the values they refer to. A query that
/// cannot be compiled against the schema of the searcher fails in
/// [`Query::weight`], before any document is examined.
///
/// When implementing a new type of `Query`, it is normal to implement a
/// dedicated `Query`, [`Weight`] and [`DocSet`](crate::DocSet).
///
/// # Query
///
/// The query is a specification of the set of documents.
/// It may also carry a reference to the schema fields it deals with.
///
/// # Weight
///
/// The weight is the query compiled against a specific searcher. It can be shared by the
/// threads collecting the different segments of that searcher.
///
/// # DocSet
///
/// The `DocSet` makes it possible to iterate through the matching documents of a segment.
pub trait Query: QueryClone + Send + Sync + downcast_rs::Downcast + fmt::Debug {
    /// Create the weight associated with a query.
    ///
    /// This is the expensive part of a query: field names are resolved, types are checked
    /// and the result can be reused for every segment of `searcher`.
    fn weight(&self, searcher: &Searcher) -> crate::Result<Box<dyn Weight>>;

    /// Returns the number of documents matching the query.
    fn count(&self, searcher: &Searcher) -> crate::Result<usize> {
        let weight = self.weight(searcher)?;
        let mut result = 0;
        for reader in searcher.segment_readers() {
            result += weight.count(reader)? as usize;
        }
        Ok(result)
    }
}

/// Implements `box_clone`.
pub trait QueryClone {
    /// Returns a boxed clone of `self`.
    fn box_clone(&self) -> Box<dyn Query>;
}

impl<T> QueryClone for T
where T: 'static + Query + Clone
{
    fn box_clone(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }
}

impl Query for Box<dyn Query> {
    fn weight(&self, searcher: &Searcher) -> crate::Result<Box<dyn Weight>> {
        self.as_ref().weight(searcher)
    }

    fn count(&self, searcher: &Searcher) -> crate::Result<usize> {
        self.as_ref().count(searcher)
    }
}

impl QueryClone for Box<dyn Query> {
    fn box_clone(&self) -> Box<dyn Query> {
        self.as_ref().box_clone()
    }
}

impl_downcast!(Query);
