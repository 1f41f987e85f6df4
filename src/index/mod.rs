//! Index, segments and segment readers.

#[allow(clippy::module_inception)]
mod index;
mod segment_reader;

pub(crate) use self::index::SealedSegment;
pub use self::index::Index;
pub use self::segment_reader::SegmentReader;
