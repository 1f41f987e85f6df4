use common::BitSet;

use crate::query::{docset_to_bitset, BitSetDocSet, EmptyScorer, Occur, Weight};
use crate::{DocSet, SegmentReader};

pub(crate) struct BooleanWeight {
    weights: Vec<(Occur, Box<dyn Weight>)>,
    matches_all: bool,
}

impl BooleanWeight {
    pub(crate) fn new(weights: Vec<(Occur, Box<dyn Weight>)>, matches_all: bool) -> BooleanWeight {
        BooleanWeight {
            weights,
            matches_all,
        }
    }

    fn sub_bitset(weight: &dyn Weight, reader: &SegmentReader) -> crate::Result<BitSet> {
        let mut docset = weight.scorer(reader)?;
        Ok(docset_to_bitset(docset.as_mut(), reader.max_doc()))
    }

    fn combine(&self, reader: &SegmentReader) -> crate::Result<Option<BitSet>> {
        let max_doc = reader.max_doc();
        let mut must: Option<BitSet> = None;
        let mut should: Option<BitSet> = None;
        let mut must_not: Option<BitSet> = None;
        for (occur, weight) in &self.weights {
            let sub_bitset = Self::sub_bitset(weight.as_ref(), reader)?;
            let acc = match occur {
                Occur::Must => &mut must,
                Occur::Should => &mut should,
                Occur::MustNot => &mut must_not,
            };
            if let Some(acc_bitset) = acc.as_mut() {
                if *occur == Occur::Must {
                    acc_bitset.intersect_update(&sub_bitset);
                } else {
                    acc_bitset.union_update(&sub_bitset);
                }
            } else {
                *acc = Some(sub_bitset);
            }
        }
        let mut included = match (must, should) {
            (Some(must), _) => must,
            (None, Some(should)) if !self.matches_all => should,
            (None, _) if self.matches_all || must_not.is_some() => {
                BitSet::with_max_value_and_full(max_doc)
            }
            (None, _) => return Ok(None),
        };
        if let Some(excluded) = must_not {
            included.difference_update(&excluded);
        }
        Ok(Some(included))
    }
}

impl Weight for BooleanWeight {
    fn scorer(&self, reader: &SegmentReader) -> crate::Result<Box<dyn DocSet>> {
        match self.combine(reader)? {
            Some(bitset) => Ok(Box::new(BitSetDocSet::from(bitset))),
            None => Ok(Box::new(EmptyScorer)),
        }
    }

    fn count(&self, reader: &SegmentReader) -> crate::Result<u32> {
        Ok(self
            .combine(reader)?
            .map(|bitset| bitset.len() as u32)
            .unwrap_or(0))
    }
}
