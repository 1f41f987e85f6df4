use common::BitSet;

use crate::aggregation::ResourceLimitGuard;
use crate::query::{docset_to_bitset, Weight};
use crate::{DocId, SegmentReader, TERMINATED};

/// Random access test of the documents of one segment against one compiled filter.
///
/// A matcher is built when the collection of a segment starts and dropped with the
/// segment's leaf collector.
#[derive(Debug)]
pub enum SegmentMatcher {
    /// The filter matches no document of the segment.
    NoMatch,
    /// The documents of the segment matching the filter.
    Bits(BitSet),
}

impl SegmentMatcher {
    /// Scopes `weight` to `segment`.
    ///
    /// The memory of the bitset is accounted in `memory_guard` before it is allocated.
    pub fn for_segment(
        weight: &dyn Weight,
        segment: &SegmentReader,
        memory_guard: &mut ResourceLimitGuard,
    ) -> crate::Result<SegmentMatcher> {
        let mut docset = weight.scorer(segment)?;
        if docset.doc() == TERMINATED {
            trace!("filter matches nothing in segment {}", segment.segment_ord());
            return Ok(SegmentMatcher::NoMatch);
        }
        let max_doc = segment.max_doc();
        memory_guard.add_memory_consumed(BitSet::num_bytes_for_max_value(max_doc).get_bytes())?;
        let bitset = docset_to_bitset(docset.as_mut(), max_doc);
        trace!(
            "filter matches {} of {max_doc} docs in segment {}",
            bitset.len(),
            segment.segment_ord()
        );
        Ok(SegmentMatcher::Bits(bitset))
    }

    /// Returns true if `doc` matches the filter.
    #[inline]
    pub fn matches(&self, doc: DocId) -> bool {
        match self {
            SegmentMatcher::NoMatch => false,
            SegmentMatcher::Bits(bitset) => bitset.contains(doc),
        }
    }
}
