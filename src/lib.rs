#![doc(test(attr(allow(unused_variables), deny(warnings))))]
#![warn(missing_docs)]
#![allow(clippy::len_without_is_empty)]

//! # `filtrate`
//!
//! filtrate computes multi-bucket filters aggregations over a segmented document
//! collection.
//!
//! An ordered list of named filters partitions the documents matching a query into
//! one bucket per filter. Filters are not mutually exclusive: a document can land in
//! several buckets. Documents matching no filter can optionally be routed into a
//! catch-all "other" bucket. Each bucket can carry nested sub-aggregations, which may
//! themselves be filters aggregations.
//!
//! ```rust
//! use filtrate::aggregation::agg_req::{Aggregation, Aggregations};
//! use filtrate::aggregation::bucket::FiltersAggregation;
//! use filtrate::aggregation::metric::StatsAggregation;
//! use filtrate::aggregation::AggregationCollector;
//! use filtrate::query::{AllQuery, TermQuery};
//! use filtrate::schema::Schema;
//! use filtrate::{doc, Index};
//!
//! # fn main() -> filtrate::Result<()> {
//! let mut schema_builder = Schema::builder();
//! let category = schema_builder.add_text_field("category");
//! let price = schema_builder.add_u64_field("price");
//! let schema = schema_builder.build();
//!
//! let index = Index::create_in_ram(schema);
//! let mut writer = index.writer();
//! writer.add_document(doc!(category => "shirt", price => 20u64))?;
//! writer.add_document(doc!(category => "shoes", price => 80u64))?;
//! writer.add_document(doc!(category => "hat", price => 15u64))?;
//! writer.commit()?;
//!
//! let filters = FiltersAggregation::new()
//!     .filter("shirts", TermQuery::new("category", "shirt"))
//!     .filter("shoes", TermQuery::new("category", "shoes"))
//!     .with_other_bucket();
//! let aggs = Aggregations::new().add(
//!     "by_category",
//!     Aggregation::filters(filters)
//!         .sub_aggregation("price_stats", Aggregation::stats(StatsAggregation::from_field_name("price"))),
//! );
//!
//! let collector = AggregationCollector::from_aggs(aggs, Default::default())?;
//! let searcher = index.reader()?.searcher();
//! let results = searcher.search(&AllQuery, &collector)?;
//! let json = serde_json::to_value(&results)?;
//! assert_eq!(json["by_category"]["buckets"][2]["key"], "_other_");
//! assert_eq!(json["by_category"]["buckets"][2]["doc_count"], 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Code organization
//!
//! - [`schema`], [`Index`], [`IndexWriter`], [`IndexReader`] and [`Searcher`] form a small
//!   in-memory search library: documents are sealed into immutable segments on commit.
//! - [`query`] holds the queries. A [`Query`](query::Query) is compiled against a
//!   [`Searcher`] into a [`Weight`](query::Weight), which in turn produces a
//!   [`DocSet`] for each segment.
//! - [`aggregation`] holds the filters aggregation engine, its bucket store and the
//!   collectors driving it.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod aggregation;
pub mod collector;
mod core;
mod docset;
mod error;
mod index;
mod indexer;
pub mod query;
mod reader;
pub mod schema;

pub use common::{BitSet, ByteCount};

pub use crate::core::{Executor, Searcher, SearcherGeneration};
pub use crate::docset::{DocSet, TERMINATED};
pub use crate::error::FiltrateError;
pub use crate::index::{Index, SegmentReader};
pub use crate::indexer::IndexWriter;
pub use crate::reader::IndexReader;
pub use crate::schema::Document;

/// Filtrate result.
pub type Result<T> = std::result::Result<T, FiltrateError>;

/// A `u32` identifying a document within a segment.
/// Documents have their `DocId` assigned incrementally,
/// as they are added in the segment.
pub type DocId = u32;

/// A `u32` identifying a segment within a [`Searcher`].
pub type SegmentOrdinal = u32;
