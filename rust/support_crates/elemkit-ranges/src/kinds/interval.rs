//! Arithmetic position intervals.

use std::ops::Range;

use elemkit_common::PageLayout;

use crate::{
    ElementRange,
    iter_state::{Cursor, IterState},
    kinds::{RangeKind, page_window},
};

/// Positions `start + k * |step|` within `[start, end)`.
///
/// A positive step traverses them in ascending order, a negative step in descending
/// order starting from the largest one. Only unit-step intervals produce runs longer
/// than one position.
///
/// Pages are the position pages spanned by `[start, end)`, taken in traversal order:
/// for a negative step, page 0 is the highest one. A page that no member falls into
/// yields an empty slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalRange {
    start: u64,
    end: u64,
    step: i64,
    layout: PageLayout,
}

impl IntervalRange {
    pub fn new(start: u64, end: u64, step: i64, layout: PageLayout) -> IntervalRange {
        debug_assert!(step != 0, "interval step must not be zero");
        IntervalRange {
            start,
            end: end.max(start),
            step,
            layout,
        }
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    #[inline]
    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    #[inline]
    fn stride(&self) -> u64 {
        self.step.unsigned_abs()
    }

    fn count(&self) -> u64 {
        (self.end - self.start).div_ceil(self.stride())
    }

    fn first_position(&self, count: u64) -> u64 {
        if self.step > 0 {
            self.start
        } else {
            self.start + (count - 1) * self.stride()
        }
    }

    /// Returns the sub-interval covering `page_count` pages starting at the
    /// `first_page`-th page in traversal order.
    fn slice_pages(&self, first_page: u64, page_count: u64) -> Option<IntervalRange> {
        let total = self.page_count();
        if page_count == 0 || first_page.checked_add(page_count)? > total {
            return None;
        }
        let position_page = if self.step > 0 {
            first_page
        } else {
            total - first_page - page_count
        };
        let window = page_window(self.layout, self.start..self.end, position_page, page_count)?;
        let stride = self.stride();
        let aligned = self
            .start
            .saturating_add((window.start - self.start).div_ceil(stride).saturating_mul(stride));
        Some(IntervalRange::new(aligned, window.end, self.step, self.layout))
    }

    fn emit(&self, state: &mut IterState) -> Option<Range<u64>> {
        let Cursor::Interval { pos, remaining } = &mut state.cursor else {
            return None;
        };
        if *remaining == 0 {
            return state.finish();
        }
        let run_start = *pos;
        if self.step == 1 {
            let run_end = (run_start + *remaining).min(self.layout.page_end_after(run_start));
            *remaining -= run_end - run_start;
            *pos = run_end;
            return Some(run_start..run_end);
        }
        *remaining -= 1;
        if *remaining > 0 {
            if self.step > 0 {
                *pos += self.stride();
            } else {
                *pos -= self.stride();
            }
        }
        Some(run_start..run_start + 1)
    }
}

impl RangeKind for IntervalRange {
    fn size(&self) -> u64 {
        self.count()
    }

    fn max_size(&self) -> u64 {
        self.count()
    }

    fn is_ordered(&self) -> bool {
        self.step > 0
    }

    fn can_contain_duplicates(&self) -> bool {
        false
    }

    fn allows_concurrent_deletion(&self) -> bool {
        true
    }

    fn is_splittable(&self) -> bool {
        true
    }

    fn page_count(&self) -> u64 {
        let pages = self.layout.pages_spanning(self.start..self.end);
        pages.end - pages.start
    }

    fn first_position_in_page(&self, page: u64) -> Option<u64> {
        let slice = self.slice_pages(page, 1)?;
        let count = slice.count();
        (count > 0).then(|| slice.first_position(count))
    }

    fn pages_to_range_slice(&self, first_page: u64, page_count: u64) -> Option<ElementRange> {
        self.slice_pages(first_page, page_count)
            .map(ElementRange::Interval)
    }

    fn rewind(&self, state: &mut IterState) -> Option<Range<u64>> {
        let count = self.count();
        if count == 0 {
            return state.finish();
        }
        state.reset(Cursor::Interval {
            pos: self.first_position(count),
            remaining: count,
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
