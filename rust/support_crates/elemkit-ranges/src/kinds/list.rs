//! Ranges backed by an explicit list of positions.

use std::ops::Range;

use elemkit_common::PageLayout;
use elemkit_shared_seq::SharedSeq;

use crate::{
    ElementRange,
    iter_state::{Cursor, IterState},
    kinds::{RangeKind, page_window},
};

/// The positions stored in `seq[window]`, traversed in list order.
///
/// Pages of a list range are chunks of `page_size` consecutive list entries, aligned to
/// list index zero. Splitting cuts the window at a page boundary; both halves share the
/// same sequence buffer.
///
/// The extra flag of the sequence marks the list as strictly ascending, which makes the
/// range ordered and free of duplicates. A trivial sequence is strictly ascending by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRange {
    seq: SharedSeq<u64>,
    window: Range<usize>,
    layout: PageLayout,
}

impl ListRange {
    pub fn new(seq: SharedSeq<u64>, window: Range<usize>, layout: PageLayout) -> ListRange {
        debug_assert!(window.start <= window.end && window.end <= seq.len());
        ListRange {
            seq,
            window,
            layout,
        }
    }

    pub fn seq(&self) -> &SharedSeq<u64> {
        &self.seq
    }

    pub fn window(&self) -> Range<usize> {
        self.window.clone()
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    fn is_strictly_ascending(&self) -> bool {
        self.seq.extra_flag() || self.seq.is_trivial()
    }

    fn index_bounds(&self) -> Range<u64> {
        self.window.start as u64..self.window.end as u64
    }

    pub(crate) fn slice_pages(&self, first_page: u64, page_count: u64) -> Option<ListRange> {
        let window = page_window(self.layout, self.index_bounds(), first_page, page_count)?;
        Some(ListRange::new(
            self.seq.clone(),
            window.start as usize..window.end as usize,
            self.layout,
        ))
    }

    /// Yields the run starting at list index `index` and advances the cursor past it.
    ///
    /// A run ends at the first non-contiguous value, at a position page boundary, or at
    /// a list page boundary.
    fn emit(&self, state: &mut IterState) -> Option<Range<u64>> {
        let Cursor::List { index } = &mut state.cursor else {
            return None;
        };
        let i = *index;
        if i >= self.window.end {
            return state.finish();
        }
        let index_limit = self
            .window
            .end
            .min(self.layout.page_end_after(i as u64) as usize);
        let start = self.seq.get(i);
        let pos_limit = self.layout.page_end_after(start);

        let mut end = start + 1;
        let mut j = i + 1;
        match self.seq.explicit_slice() {
            None => {
                let len = ((index_limit - i) as u64).min(pos_limit - start);
                end = start + len;
                j = i + len as usize;
            }
            Some(values) => {
                while j < index_limit && end < pos_limit && values[j] == end {
                    end += 1;
                    j += 1;
                }
            }
        }
        *index = j;
        Some(start..end)
    }
}

impl RangeKind for ListRange {
    fn size(&self) -> u64 {
        self.window.len() as u64
    }

    fn max_size(&self) -> u64 {
        self.window.len() as u64
    }

    fn is_ordered(&self) -> bool {
        self.is_strictly_ascending()
    }

    fn can_contain_duplicates(&self) -> bool {
        !self.is_strictly_ascending()
    }

    fn allows_concurrent_deletion(&self) -> bool {
        true
    }

    fn is_splittable(&self) -> bool {
        true
    }

    fn page_count(&self) -> u64 {
        let pages = self.layout.pages_spanning(self.index_bounds());
        pages.end - pages.start
    }

    fn first_position_in_page(&self, page: u64) -> Option<u64> {
        let window = page_window(self.layout, self.index_bounds(), page, 1)?;
        Some(self.seq.get(window.start as usize))
    }

    fn pages_to_range_slice(&self, first_page: u64, page_count: u64) -> Option<ElementRange> {
        self.slice_pages(first_page, page_count)
            .map(ElementRange::List)
    }

    fn rewind(&self, state: &mut IterState) -> Option<Range<u64>> {
        state.reset(Cursor::List {
            index: self.window.start,
        });
        self.emit(state)
    }

    fn next(&self, state: &mut IterState) -> Option<Range<u64>> {
        if state.is_unstarted() {
            return self.rewind(state);
        }
        self.emit(state)
    }
}
