use crate::{DocSet, SegmentReader};

/// A Weight is the specialization of a `Query`
/// for a given set of segments.
///
/// See [`Query`](crate::query::Query).
pub trait Weight: Send + Sync + 'static {
    /// Returns the docset of the documents of `reader` matching the weight.
    ///
    /// The docset is positioned on its first document.
    fn scorer(&self, reader: &SegmentReader) -> crate::Result<Box<dyn DocSet>>;

    /// Returns the number documents within the given [`SegmentReader`].
    fn count(&self, reader: &SegmentReader) -> crate::Result<u32> {
        let mut scorer = self.scorer(reader)?;
        Ok(scorer.count())
    }
}
