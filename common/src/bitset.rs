use std::fmt;

use crate::ByteCount;

/// A set of `u32` within `[0, 64)`, stored as a single `u64` word.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct TinySet(u64);

impl fmt::Debug for TinySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.into_iter().collect::<Vec<u32>>().fmt(f)
    }
}

pub struct TinySetIterator(TinySet);
impl Iterator for TinySetIterator {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lowest()
    }
}

impl IntoIterator for TinySet {
    type Item = u32;
    type IntoIter = TinySetIterator;
    fn into_iter(self) -> Self::IntoIter {
        TinySetIterator(self)
    }
}

impl TinySet {
    /// Returns an empty `TinySet`.
    #[inline]
    pub fn empty() -> TinySet {
        TinySet(0u64)
    }

    /// Returns a full `TinySet`.
    #[inline]
    pub fn full() -> TinySet {
        TinySet(!0u64)
    }

    /// Returns true iff the `TinySet` contains the element `el`.
    #[inline]
    pub fn contains(self, el: u32) -> bool {
        !self.intersect(TinySet::singleton(el)).is_empty()
    }

    /// Returns the number of elements in the TinySet.
    #[inline]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns the intersection of `self` and `other`
    #[inline]
    #[must_use]
    pub fn intersect(self, other: TinySet) -> TinySet {
        TinySet(self.0 & other.0)
    }

    /// Returns the union of two tinysets
    #[inline]
    #[must_use]
    pub fn union(self, other: TinySet) -> TinySet {
        TinySet(self.0 | other.0)
    }

    /// Returns the elements of `self` that are not in `other`.
    #[inline]
    #[must_use]
    pub fn difference(self, other: TinySet) -> TinySet {
        TinySet(self.0 & !other.0)
    }

    /// Creates a new `TinySet` containing only one element
    /// within `[0; 64[`
    #[inline]
    pub fn singleton(el: u32) -> TinySet {
        TinySet(1u64 << u64::from(el))
    }

    /// Insert a new element within [0..64)
    ///
    /// returns true if the set changed
    #[inline]
    pub fn insert_mut(&mut self, el: u32) -> bool {
        let old = *self;
        *self = old.union(TinySet::singleton(el));
        old != *self
    }

    /// Remove a element within [0..64)
    ///
    /// returns true if the set changed
    #[inline]
    pub fn remove_mut(&mut self, el: u32) -> bool {
        let old = *self;
        *self = old.difference(TinySet::singleton(el));
        old != *self
    }

    /// Returns true iff the `TinySet` is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0u64
    }

    /// Returns the lowest element in the `TinySet`
    /// and removes it.
    #[inline]
    pub fn pop_lowest(&mut self) -> Option<u32> {
        if self.is_empty() {
            None
        } else {
            let lowest = self.0.trailing_zeros();
            self.0 ^= TinySet::singleton(lowest).0;
            Some(lowest)
        }
    }

    /// Returns a `TinySet` than contains all values up
    /// to limit excluded.
    ///
    /// The limit is assumed to be strictly lower than 64.
    pub fn range_lower(upper_bound: u32) -> TinySet {
        TinySet((1u64 << u64::from(upper_bound % 64u32)) - 1u64)
    }
}

/// A fixed capacity set of `u32` in `[0, max_value)`.
///
/// This is the random access representation of the documents of a segment
/// matching a given predicate.
#[derive(Clone)]
pub struct BitSet {
    tinysets: Box<[TinySet]>,
    len: u64,
    max_value: u32,
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSet")
            .field("len", &self.len)
            .field("max_value", &self.max_value)
            .finish()
    }
}

fn num_buckets(max_val: u32) -> u32 {
    max_val.div_ceil(64u32)
}

impl BitSet {
    /// Create a new `BitSet` that may contain elements
    /// within `[0, max_val)`.
    pub fn with_max_value(max_value: u32) -> BitSet {
        let num_buckets = num_buckets(max_value);
        let tinysets = vec![TinySet::empty(); num_buckets as usize].into_boxed_slice();
        BitSet {
            tinysets,
            len: 0,
            max_value,
        }
    }

    /// Create a new `BitSet` that may contain elements. Initially all values will be set.
    /// within `[0, max_val)`.
    pub fn with_max_value_and_full(max_value: u32) -> BitSet {
        let num_buckets = num_buckets(max_value);
        let mut tinysets = vec![TinySet::full(); num_buckets as usize].into_boxed_slice();

        // Fix padding
        let lower = max_value % 64u32;
        if lower != 0 {
            tinysets[tinysets.len() - 1] = TinySet::range_lower(lower);
        }
        BitSet {
            tinysets,
            len: max_value as u64,
            max_value,
        }
    }

    /// Removes all elements from the `BitSet`.
    pub fn clear(&mut self) {
        for tinyset in self.tinysets.iter_mut() {
            *tinyset = TinySet::empty();
        }
        self.len = 0;
    }

    /// Keeps only the elements also present in `other`.
    pub fn intersect_update(&mut self, other: &BitSet) {
        self.update_with(other, TinySet::intersect);
    }

    /// Adds all the elements of `other`.
    pub fn union_update(&mut self, other: &BitSet) {
        self.update_with(other, TinySet::union);
    }

    /// Removes all the elements of `other`.
    pub fn difference_update(&mut self, other: &BitSet) {
        self.update_with(other, TinySet::difference);
    }

    fn update_with(&mut self, other: &BitSet, op: impl Fn(TinySet, TinySet) -> TinySet) {
        assert_eq!(self.max_value, other.max_value);
        self.len = 0;
        for (left, right) in self.tinysets.iter_mut().zip(other.tinysets.iter().copied()) {
            *left = op(*left, right);
            self.len += left.len() as u64;
        }
    }

    /// Returns the number of elements in the `BitSet`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns true iff the `BitSet` holds no element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts an element in the `BitSet`
    #[inline]
    pub fn insert(&mut self, el: u32) {
        debug_assert!(el < self.max_value);
        let higher = el / 64u32;
        let lower = el % 64u32;
        self.len += u64::from(self.tinysets[higher as usize].insert_mut(lower));
    }

    /// Removes an element from the `BitSet`
    #[inline]
    pub fn remove(&mut self, el: u32) {
        let higher = el / 64u32;
        let lower = el % 64u32;
        self.len -= u64::from(self.tinysets[higher as usize].remove_mut(lower));
    }

    /// Returns true iff the elements is in the `BitSet`.
    ///
    /// Elements outside of `[0, max_value)` are never contained.
    #[inline]
    pub fn contains(&self, el: u32) -> bool {
        self.tinysets
            .get((el / 64u32) as usize)
            .map(|tinyset| tinyset.contains(el % 64))
            .unwrap_or(false)
    }

    /// Returns the first non-empty `TinySet` associated with a bucket lower
    /// or greater than bucket.
    ///
    /// Reminder: the tiny set with the bucket `bucket`, represents the
    /// elements from `bucket * 64` to `(bucket+1) * 64`.
    pub fn first_non_empty_bucket(&self, bucket: u32) -> Option<u32> {
        self.tinysets
            .get(bucket as usize..)?
            .iter()
            .position(|tinyset| !tinyset.is_empty())
            .map(|delta_bucket| bucket + delta_bucket as u32)
    }

    /// Maximum value the bitset may contain.
    /// (Note this is not the maximum value contained in the set.)
    #[inline]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Number of 64-element buckets.
    #[inline]
    pub fn num_buckets(&self) -> u32 {
        self.tinysets.len() as u32
    }

    /// Returns the tiny bitset representing the
    /// the set restricted to the number range from
    /// `bucket * 64` to `(bucket + 1) * 64`.
    #[inline]
    pub fn tinyset(&self, bucket: u32) -> TinySet {
        self.tinysets[bucket as usize]
    }

    /// Iterate over the elements in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.tinysets
            .iter()
            .enumerate()
            .flat_map(|(bucket, tinyset)| {
                let base = bucket as u32 * 64;
                tinyset.into_iter().map(move |lower| base + lower)
            })
    }

    /// Memory taken by a bitset over `[0, max_value)`, known before allocating it.
    pub fn num_bytes_for_max_value(max_value: u32) -> ByteCount {
        (u64::from(num_buckets(max_value)) * std::mem::size_of::<TinySet>() as u64).into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use rand::distributions::Bernoulli;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::{BitSet, TinySet};

    #[test]
    fn test_tiny_set_pop_lowest() {
        let mut tinyset = TinySet::empty();
        assert!(tinyset.insert_mut(5));
        assert!(tinyset.insert_mut(63));
        assert!(!tinyset.insert_mut(5));
        assert_eq!(tinyset.pop_lowest(), Some(5));
        assert_eq!(tinyset.pop_lowest(), Some(63));
        assert_eq!(tinyset.pop_lowest(), None);
    }

    #[test]
    fn test_tiny_set_range_lower() {
        assert_eq!(TinySet::range_lower(3).into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(TinySet::range_lower(0).is_empty());
    }

    #[test]
    fn test_bitset_full_padding() {
        for max_value in [0u32, 1, 63, 64, 65, 130] {
            let bitset = BitSet::with_max_value_and_full(max_value);
            assert_eq!(bitset.len(), max_value as usize);
            assert_eq!(bitset.iter().count(), max_value as usize);
            assert!(!bitset.contains(max_value));
        }
    }

    #[test]
    fn test_bitset_contains_out_of_range() {
        let mut bitset = BitSet::with_max_value(10);
        bitset.insert(9);
        assert!(bitset.contains(9));
        assert!(!bitset.contains(10_000));
    }

    #[test]
    fn test_bitset_set_ops() {
        let mut left = BitSet::with_max_value(200);
        let mut right = BitSet::with_max_value(200);
        for el in [1, 64, 65, 199] {
            left.insert(el);
        }
        for el in [64, 100, 199] {
            right.insert(el);
        }
        let mut intersection = left.clone();
        intersection.intersect_update(&right);
        assert_eq!(intersection.iter().collect::<Vec<_>>(), vec![64, 199]);
        assert_eq!(intersection.len(), 2);

        let mut union = left.clone();
        union.union_update(&right);
        assert_eq!(union.iter().collect::<Vec<_>>(), vec![1, 64, 65, 100, 199]);

        left.difference_update(&right);
        assert_eq!(left.iter().collect::<Vec<_>>(), vec![1, 65]);
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn test_bitset_num_bytes_for_max_value() {
        assert_eq!(BitSet::num_bytes_for_max_value(0).get_bytes(), 0);
        assert_eq!(BitSet::num_bytes_for_max_value(1).get_bytes(), 8);
        assert_eq!(BitSet::num_bytes_for_max_value(64).get_bytes(), 8);
        assert_eq!(BitSet::num_bytes_for_max_value(65).get_bytes(), 16);
        assert_eq!(BitSet::with_max_value(65).num_buckets(), 2);
    }

    #[test]
    fn test_bitset_first_non_empty_bucket() {
        let mut bitset = BitSet::with_max_value(1_000);
        assert_eq!(bitset.first_non_empty_bucket(0), None);
        bitset.insert(700);
        assert_eq!(bitset.first_non_empty_bucket(0), Some(10));
        assert_eq!(bitset.first_non_empty_bucket(11), None);
        assert_eq!(bitset.first_non_empty_bucket(100), None);
    }

    #[test]
    fn test_bitset_random_against_btreeset() {
        let mut rng = StdRng::seed_from_u64(42);
        let distribution = Bernoulli::new(0.1).unwrap();
        let max_value = 10_000u32;
        let mut bitset = BitSet::with_max_value(max_value);
        let mut expected = BTreeSet::new();
        for el in 0..max_value {
            if rng.sample(distribution) {
                bitset.insert(el);
                expected.insert(el);
            }
        }
        assert_eq!(bitset.len(), expected.len());
        assert!(bitset.iter().eq(expected.iter().copied()));
        for el in 0..max_value {
            assert_eq!(bitset.contains(el), expected.contains(&el));
        }
    }

    proptest! {
        #[test]
        fn test_bitset_insert_remove_len(els in proptest::collection::vec(0u32..500, 0..100)) {
            let mut bitset = BitSet::with_max_value(500);
            let mut expected = BTreeSet::new();
            for &el in &els {
                bitset.insert(el);
                expected.insert(el);
            }
            prop_assert_eq!(bitset.len(), expected.len());
            for &el in els.iter().step_by(2) {
                bitset.remove(el);
                expected.remove(&el);
            }
            prop_assert_eq!(bitset.len(), expected.len());
            prop_assert!(bitset.iter().eq(expected.iter().copied()));
        }
    }
}
