use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use common::ByteCount;

use super::{AggregationError, DEFAULT_BUCKET_LIMIT, DEFAULT_MEMORY_LIMIT};

/// Aggregation memory limit after which the request fails. Defaults to DEFAULT_MEMORY_LIMIT
/// (500MB). The limit is shared by all the segments of a request.
///
/// Also carries the maximum number of buckets a request may return.
pub struct AggregationLimits {
    /// The counter which is shared between the aggregations for one request.
    memory_consumption: Arc<AtomicU64>,
    /// The memory_limit in bytes
    memory_limit: ByteCount,
    /// The maximum number of buckets _returned_
    /// This is not counting intermediate buckets.
    bucket_limit: u32,
}

impl Clone for AggregationLimits {
    fn clone(&self) -> Self {
        Self {
            memory_consumption: Arc::clone(&self.memory_consumption),
            memory_limit: self.memory_limit,
            bucket_limit: self.bucket_limit,
        }
    }
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self {
            memory_consumption: Default::default(),
            memory_limit: DEFAULT_MEMORY_LIMIT.into(),
            bucket_limit: DEFAULT_BUCKET_LIMIT,
        }
    }
}

impl AggregationLimits {
    /// *memory_limit*
    /// memory_limit is defined in bytes.
    /// Aggregation fails when the estimated memory consumption of the aggregation is higher than
    /// memory_limit.
    /// memory_limit will default to `DEFAULT_MEMORY_LIMIT` (500MB)
    ///
    /// *bucket_limit*
    /// Limits the maximum number of buckets returned from an aggregation request.
    /// bucket_limit will default to `DEFAULT_BUCKET_LIMIT` (65000)
    ///
    /// Note: The returned instance contains a Arc shared counter to track memory consumption.
    pub fn new(memory_limit: Option<u64>, bucket_limit: Option<u32>) -> Self {
        Self {
            memory_consumption: Default::default(),
            memory_limit: memory_limit.unwrap_or(DEFAULT_MEMORY_LIMIT).into(),
            bucket_limit: bucket_limit.unwrap_or(DEFAULT_BUCKET_LIMIT),
        }
    }

    /// Create a new ResourceLimitGuard, that will release the memory when dropped.
    pub fn new_guard(&self) -> ResourceLimitGuard {
        ResourceLimitGuard {
            memory_consumption: Arc::clone(&self.memory_consumption),
            memory_limit: self.memory_limit,
            allocated_with_the_guard: 0,
        }
    }

    /// Returns the memory currently accounted for, across all guards.
    pub fn memory_consumed(&self) -> ByteCount {
        self.memory_consumption.load(Ordering::Relaxed).into()
    }

    /// Returns the memory limit.
    pub fn memory_limit(&self) -> ByteCount {
        self.memory_limit
    }

    /// Returns the maximum number of buckets a request may return.
    pub fn get_bucket_limit(&self) -> u32 {
        self.bucket_limit
    }
}

fn validate_memory_consumption(
    memory_consumption: &AtomicU64,
    memory_limit: ByteCount,
) -> Result<(), AggregationError> {
    // Load the estimated memory consumed by the aggregations
    let memory_consumed: ByteCount = memory_consumption.load(Ordering::Relaxed).into();
    if memory_consumed > memory_limit {
        return Err(AggregationError::MemoryExceeded {
            limit: memory_limit,
            current: memory_consumed,
        });
    }
    Ok(())
}

/// Tracks the memory allocated by one owner against the request's shared counter.
///
/// Everything accounted through the guard is released when it is dropped.
pub struct ResourceLimitGuard {
    /// The counter which is shared between the aggregations for one request.
    memory_consumption: Arc<AtomicU64>,
    /// The memory_limit in bytes
    memory_limit: ByteCount,
    /// Allocated memory with this guard.
    allocated_with_the_guard: u64,
}

impl ResourceLimitGuard {
    /// Accounts `num_bytes` and fails if the shared consumption exceeds the limit.
    ///
    /// The bytes stay accounted even when the limit is exceeded, until the guard is dropped.
    /// A request that would overflow the shared counter is rejected without being accounted.
    pub(crate) fn add_memory_consumed(&mut self, num_bytes: u64) -> crate::Result<()> {
        self.memory_consumption
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |consumed| {
                consumed.checked_add(num_bytes)
            })
            .map_err(|consumed| AggregationError::MemoryExceeded {
                limit: self.memory_limit,
                current: consumed.saturating_add(num_bytes).into(),
            })?;
        self.allocated_with_the_guard = self.allocated_with_the_guard.saturating_add(num_bytes);
        validate_memory_consumption(&self.memory_consumption, self.memory_limit)?;
        Ok(())
    }

    /// Memory accounted through this guard.
    pub fn allocated(&self) -> ByteCount {
        self.allocated_with_the_guard.into()
    }
}

impl Drop for ResourceLimitGuard {
    /// Removes the memory consumed tracked by this _instance_ of AggregationLimits.
    /// This is used to clear the segment specific memory consumption all at once.
    fn drop(&mut self) {
        self.memory_consumption
            .fetch_sub(self.allocated_with_the_guard, Ordering::Relaxed);
    }
}
