#[allow(clippy::module_inception)]
mod range_query;

pub use self::range_query::RangeQuery;
