//! Snapshots of arbitrary ranges.

use std::ops::Range;

use elemkit_shared_seq::SharedSeq;

use crate::{
    ElementRange,
    iter_state::IterState,
    kinds::{RangeKind, list::ListRange},
};

/// Order applied to the positions captured by a [`CachedRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheOrder {
    /// Keep the inner range's traversal order.
    #[default]
    Traversal,
    Ascending,
    Descending,
}

/// The positions of an inner range captured into a private [`SharedSeq`] at
/// construction time.
///
/// Afterwards the range behaves like a list range and is unaffected by changes to
/// whatever backed the inner range, so visited elements can be deleted from the
/// universe during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRange {
    list: ListRange,
    order: CacheOrder,
    /// Captured positions are non-decreasing; duplicates may still occur.
    ascending: bool,
}

impl CachedRange {
    pub fn new(inner: &ElementRange, order: CacheOrder) -> CachedRange {
        let mut seq = SharedSeq::new();
        for run in inner.runs() {
            seq.extend(run);
        }
        let unique = !inner.can_contain_duplicates();
        let ascending = match order {
            CacheOrder::Traversal => inner.is_ordered(),
            CacheOrder::Ascending => {
                seq.sort_ascending();
                true
            }
            CacheOrder::Descending => {
                seq.sort_descending();
                false
            }
        };
        seq.set_extra_flag(ascending && unique);
        log::debug!(
            "CachedRange: captured {} positions (trivial: {}, order: {order:?})",
            seq.len(),
            seq.is_trivial()
        );
        let len = seq.len();
        CachedRange {
            list: ListRange::new(seq, 0..len, inner.layout()),
            order,
            ascending,
        }
    }

    pub fn order(&self) -> CacheOrder {
        self.order
    }

    pub fn list(&self) -> &ListRange {
        &self.list
    }
}

impl RangeKind for CachedRange {
    fn size(&self) -> u64 {
        self.list.size()
    }

    fn max_size(&self) -> u64 {
        self.list.max_size()
    }

    fn is_ordered(&self) -> bool {
        self.ascending || self.list.is_ordered()
    }

    fn can_contain_duplicates(&self) -> bool {
        self.list.can_contain_duplicates()
    }

    fn allows_concurrent_deletion(&self) -> bool {
        true
    }

    fn is_splittable(&self) -> bool {
        true
    }

    fn page_count(&self) -> u64 {
        self.list.page_count()
    }

    fn first_position_in_page(&self, page: u64) -> Option<u64> {
        self.list.first_position_in_page(page)
    }

    fn pages_to_range_slice(&self, first_page: u64, page_count: u64) -> Option<ElementRange> {
        let list = self.list.slice_pages(first_page, page_count)?;
        Some(ElementRange::Cached(CachedRange {
            list,
            order: self.order,
            ascending: self.ascending,
        }))
    }

    fn rewind(&self, state: &mut IterState) -> Option<Range<u64>> {
        self.list.rewind(state)
    }

    fn next(&self, state: &mut IterState) -> Option<Range<u64>> {
        self.list.next(state)
    }
}
