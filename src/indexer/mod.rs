//! Indexing.

mod index_writer;

pub use self::index_writer::IndexWriter;
