//! Addressing of the buckets of a multi-bucket aggregation.
//!
//! Every bucket of an aggregation lives at a dense `u64` ordinal of the
//! [`BucketAccumulator`](super::bucket_store::BucketAccumulator) backing it:
//!
//! ```text
//! ordinal = owning_ordinal * total_slots + slot
//! ```
//!
//! `owning_ordinal` is the ordinal of the enclosing bucket, `0` at the top level. Nesting
//! therefore composes: the children of bucket `o` occupy `[o * total_slots, (o + 1) * total_slots)`
//! and two different `(owning_ordinal, slot)` pairs never share an ordinal.

use super::AggregationError;

/// Ordinal of a bucket within a bucket accumulator.
pub type BucketOrdinal = u64;

/// A slot of a filters aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketSlot {
    /// The bucket of the filter at the given position.
    Filter(usize),
    /// The bucket of the documents matching no filter.
    Other,
}

/// Maps the slots of an aggregation to bucket ordinals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketOrdinals {
    num_filters: usize,
    has_other: bool,
}

impl BucketOrdinals {
    /// Creates the addressing of an aggregation with `num_filters` filters, plus one extra
    /// slot if `has_other` is set.
    pub fn new(num_filters: usize, has_other: bool) -> BucketOrdinals {
        BucketOrdinals {
            num_filters,
            has_other,
        }
    }

    /// Number of filter slots.
    pub fn num_filters(&self) -> usize {
        self.num_filters
    }

    /// Whether the last slot is the "other" bucket.
    pub fn has_other(&self) -> bool {
        self.has_other
    }

    /// Number of slots reserved per owning ordinal.
    pub fn total_slots(&self) -> u64 {
        self.num_filters as u64 + u64::from(self.has_other)
    }

    fn slot_index(&self, slot: BucketSlot) -> Result<u64, AggregationError> {
        let total_slots = self.total_slots();
        let slot_index = match slot {
            BucketSlot::Filter(pos) if pos < self.num_filters => pos as u64,
            BucketSlot::Filter(pos) => {
                return Err(AggregationError::UnreachableSlot {
                    slot: pos as u64,
                    total_slots,
                })
            }
            BucketSlot::Other if self.has_other => total_slots - 1,
            BucketSlot::Other => {
                return Err(AggregationError::UnreachableSlot {
                    slot: total_slots,
                    total_slots,
                })
            }
        };
        Ok(slot_index)
    }

    /// Returns the ordinal of `slot` within the bucket `owning_ordinal`.
    ///
    /// Fails if the slot does not exist, or if the ordinal does not fit in a `u64`.
    pub fn bucket_ord(
        &self,
        owning_ordinal: BucketOrdinal,
        slot: BucketSlot,
    ) -> Result<BucketOrdinal, AggregationError> {
        let slot_index = self.slot_index(slot)?;
        let total_slots = self.total_slots();
        owning_ordinal
            .checked_mul(total_slots)
            .and_then(|base| base.checked_add(slot_index))
            .ok_or(AggregationError::OrdinalOverflow {
                owning_ordinal,
                total_slots,
            })
    }

    /// Returns the slots in output order: the filters in declared order, then "other".
    pub fn slots(&self) -> impl Iterator<Item = BucketSlot> {
        (0..self.num_filters)
            .map(BucketSlot::Filter)
            .chain(self.has_other.then_some(BucketSlot::Other))
    }
}
