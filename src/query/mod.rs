//! Module containing the different query implementations.
//!
//! A [`Query`] is compiled against a [`Searcher`](crate::Searcher) into a [`Weight`]. The
//! weight is the compiled predicate: it can be reused for every segment of that searcher
//! and produces a [`DocSet`](crate::DocSet) of the matching documents for each of them.

mod all_query;
mod bitset;
mod boolean_query;
mod empty_query;
mod exist_query;
mod occur;
#[allow(clippy::module_inception)]
mod query;
mod range_query;
mod term_query;
mod vec_docset;
mod weight;

pub use self::all_query::{AllQuery, AllScorer, AllWeight};
pub use self::bitset::{docset_to_bitset, BitSetDocSet};
pub use self::boolean_query::BooleanQuery;
pub use self::empty_query::{EmptyQuery, EmptyScorer, EmptyWeight};
pub use self::exist_query::ExistsQuery;
pub use self::occur::Occur;
pub use self::query::{Query, QueryClone};
pub use self::range_query::RangeQuery;
pub use self::term_query::TermQuery;
pub use self::vec_docset::VecDocSet;
pub use self::weight::Weight;
