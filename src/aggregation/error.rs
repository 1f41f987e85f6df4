use common::ByteCount;
use thiserror::Error;

/// Error that may occur while building or running an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// A filter could not be compiled against the searcher.
    #[error("Failed to compile filter '{filter}': {reason}")]
    CompilationError {
        /// Key of the filter, or name of the aggregation for metrics.
        filter: String,
        /// Why the compilation failed.
        reason: String,
    },
    /// The bucket ordinal does not fit the ordinal space.
    #[error(
        "Bucket ordinal overflow: owning ordinal {owning_ordinal} with {total_slots} slots \
         exceeds the addressable ordinal space"
    )]
    OrdinalOverflow {
        /// Ordinal of the enclosing bucket.
        owning_ordinal: u64,
        /// Number of slots of the aggregation.
        total_slots: u64,
    },
    /// A slot outside of `[0, total_slots)` was addressed.
    #[error("Bucket slot {slot} is not addressable, the aggregation only has {total_slots} slots")]
    UnreachableSlot {
        /// The addressed slot.
        slot: u64,
        /// Number of slots of the aggregation.
        total_slots: u64,
    },
    /// Memory limit exceeded.
    #[error(
        "Aborting aggregation because memory limit was exceeded. Limit: {limit:?}, Current: \
         {current:?}"
    )]
    MemoryExceeded {
        /// Memory consumption limit
        limit: ByteCount,
        /// Current memory consumption
        current: ByteCount,
    },
    /// Bucket limit exceeded.
    #[error(
        "Aborting aggregation because bucket limit was exceeded. Limit: {limit:?}, Current: \
         {current:?}"
    )]
    BucketLimitExceeded {
        /// Bucket limit
        limit: u32,
        /// Current number of buckets
        current: u32,
    },
}
