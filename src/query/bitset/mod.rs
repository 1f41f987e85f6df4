use common::{BitSet, TinySet};

use crate::docset::{DocSet, TERMINATED};
use crate::DocId;

/// A `BitSetDocSet` makes it possible to iterate through a bitset as if it was a `DocSet`.
///
/// # Implementation detail
///
/// Skipping is relatively fast here as we can directly point to the
/// right tiny bitset bucket.
pub struct BitSetDocSet {
    docs: BitSet,
    cursor_bucket: u32, //< index associated with the current tiny bitset
    cursor_tinybitset: TinySet,
    doc: u32,
}

impl BitSetDocSet {
    fn go_to_bucket(&mut self, bucket_addr: u32) {
        self.cursor_bucket = bucket_addr;
        self.cursor_tinybitset = self.docs.tinyset(bucket_addr);
    }

    /// Returns the underlying bitset.
    pub fn into_bitset(self) -> BitSet {
        self.docs
    }
}

impl From<BitSet> for BitSetDocSet {
    fn from(docs: BitSet) -> BitSetDocSet {
        let first_tiny_bitset = if docs.num_buckets() == 0 {
            TinySet::empty()
        } else {
            docs.tinyset(0)
        };
        let mut docset = BitSetDocSet {
            docs,
            cursor_bucket: 0,
            cursor_tinybitset: first_tiny_bitset,
            doc: 0u32,
        };
        docset.advance();
        docset
    }
}

impl DocSet for BitSetDocSet {
    #[inline]
    fn advance(&mut self) -> DocId {
        if let Some(lower) = self.cursor_tinybitset.pop_lowest() {
            self.doc = (self.cursor_bucket * 64u32) | lower;
            return self.doc;
        }
        if let Some(cursor_bucket) = self.docs.first_non_empty_bucket(self.cursor_bucket + 1) {
            self.go_to_bucket(cursor_bucket);
            let lower = self.cursor_tinybitset.pop_lowest().unwrap_or_default();
            self.doc = (cursor_bucket * 64u32) | lower;
            self.doc
        } else {
            self.doc = TERMINATED;
            TERMINATED
        }
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if target >= self.docs.max_value() {
            self.doc = TERMINATED;
            return TERMINATED;
        }
        let target_bucket = target / 64u32;
        if target_bucket > self.cursor_bucket {
            self.go_to_bucket(target_bucket);
            let greater_filter: TinySet = TinySet::full().difference(TinySet::range_lower(target));
            self.cursor_tinybitset = self.cursor_tinybitset.intersect(greater_filter);
            self.advance()
        } else {
            let mut doc = self.doc();
            while doc < target {
                doc = self.advance();
            }
            doc
        }
    }

    /// Returns the current document
    #[inline]
    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> u32 {
        self.docs.len() as u32
    }
}

/// Consumes `docset` into a [`BitSet`] over `[0, max_doc)`.
pub fn docset_to_bitset(docset: &mut dyn DocSet, max_doc: DocId) -> BitSet {
    let mut bitset = BitSet::with_max_value(max_doc);
    let mut doc = docset.doc();
    while doc != TERMINATED {
        bitset.insert(doc);
        doc = docset.advance();
    }
    bitset
}

#[cfg(test)]
mod tests {
    use common::BitSet;
    use rand::distributions::{Bernoulli, Distribution};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{docset_to_bitset, BitSetDocSet};
    use crate::docset::{DocSet, TERMINATED};
    use crate::query::VecDocSet;
    use crate::DocId;

    fn create_docbitset(docs: &[DocId], max_doc: DocId) -> BitSetDocSet {
        let mut docset = BitSet::with_max_value(max_doc);
        for &doc in docs {
            docset.insert(doc);
        }
        BitSetDocSet::from(docset)
    }

    fn test_go_through_sequential(docs: &[DocId]) {
        let mut docset = create_docbitset(docs, 1_000u32);
        for &doc in docs {
            assert_eq!(docset.doc(), doc);
            docset.advance();
        }
        assert_eq!(docset.advance(), TERMINATED);
    }

    #[test]
    fn test_docbitset_sequential() {
        test_go_through_sequential(&[]);
        test_go_through_sequential(&[1, 2]);
        test_go_through_sequential(&[1, 2, 150]);
        test_go_through_sequential(&[1, 2, 150, 151]);
        test_go_through_sequential(&[1, 2, 63, 64, 65, 150, 151]);
        test_go_through_sequential(&[0, 999]);
    }

    #[test]
    fn test_bitset_large_gap() {
        let mut docset = create_docbitset(&[0, 3, 300], 1_000u32);
        assert_eq!(docset.doc(), 0);
        assert_eq!(docset.advance(), 3);
        assert_eq!(docset.advance(), 300);
        assert_eq!(docset.advance(), TERMINATED);
    }

    #[test]
    fn test_bitset_seek() {
        let mut docset = create_docbitset(&[1, 2, 3, 128, 129, 130], 1_000u32);
        assert_eq!(docset.seek(2), 2);
        assert_eq!(docset.seek(4), 128);
        assert_eq!(docset.seek(130), 130);
        assert_eq!(docset.seek(131), TERMINATED);

        let mut docset = create_docbitset(&[5, 700], 1_000u32);
        assert_eq!(docset.seek(600), 700);
        let mut docset = create_docbitset(&[5, 700], 1_000u32);
        assert_eq!(docset.seek(1_000), TERMINATED);
    }

    #[test]
    fn test_bitset_docset_randomized() {
        let mut rng = StdRng::seed_from_u64(17);
        let bernoulli = Bernoulli::new(0.1).unwrap();
        let max_doc = 2_000u32;
        let docs: Vec<DocId> = (0..max_doc).filter(|_| bernoulli.sample(&mut rng)).collect();
        let mut bitset_docset = create_docbitset(&docs, max_doc);
        let mut vec_docset = VecDocSet::from(docs.clone());
        loop {
            assert_eq!(bitset_docset.doc(), vec_docset.doc());
            if vec_docset.doc() == TERMINATED {
                break;
            }
            bitset_docset.advance();
            vec_docset.advance();
        }
        let bitset = docset_to_bitset(&mut VecDocSet::from(docs.clone()), max_doc);
        assert_eq!(bitset.iter().collect::<Vec<_>>(), docs);
    }
}
