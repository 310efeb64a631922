//! Precomputed containment checks over a range's positions.

use std::ops::Range;

use elemkit_shared_seq::SharedSeq;

use crate::ElementRange;

/// A containment helper built eagerly from the positions of an [`ElementRange`].
///
/// The representation is chosen by density:
/// - no positions: `Empty`;
/// - a single contiguous run: `Interval`;
/// - positions spread over a span of at most 64 times their count: `Dense` bitmap;
/// - otherwise: `Sorted`, a deduplicated ascending list searched by bisection.
#[derive(Debug, Clone)]
pub enum MembershipQuery {
    Empty,
    Interval(Range<u64>),
    Dense { base: u64, words: Vec<u64> },
    Sorted(SharedSeq<u64>),
}

impl MembershipQuery {
    pub fn build(range: &ElementRange) -> MembershipQuery {
        if let ElementRange::Interval(interval) = range {
            if interval.step().unsigned_abs() == 1 {
                return if interval.start() < interval.end() {
                    MembershipQuery::Interval(interval.start()..interval.end())
                } else {
                    MembershipQuery::Empty
                };
            }
        }

        let mut seq = SharedSeq::<u64>::new();
        for run in range.runs() {
            seq.extend(run);
        }
        let count = seq.sort_and_remove_duplicates();
        let (Some(min), Some(max)) = (seq.first(), seq.last()) else {
            return MembershipQuery::Empty;
        };
        if seq.is_trivial() {
            return MembershipQuery::Interval(min..max + 1);
        }
        let span = max - min + 1;
        if span <= (count as u64).saturating_mul(64) {
            let mut words = vec![0u64; span.div_ceil(64) as usize];
            seq.for_each(|pos| {
                let offset = pos - min;
                words[(offset >> 6) as usize] |= 1 << (offset & 63);
            });
            return MembershipQuery::Dense { base: min, words };
        }
        MembershipQuery::Sorted(seq)
    }

    pub fn contains(&self, pos: u64) -> bool {
        match self {
            MembershipQuery::Empty => false,
            MembershipQuery::Interval(range) => range.contains(&pos),
            MembershipQuery::Dense { base, words } => {
                if pos < *base {
                    return false;
                }
                let offset = pos - base;
                words
                    .get((offset >> 6) as usize)
                    .is_some_and(|word| word & (1 << (offset & 63)) != 0)
            }
            MembershipQuery::Sorted(seq) => seq.find_sorted(pos, 0).is_some(),
        }
    }
}
