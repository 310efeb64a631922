//! Predicate-filtered ranges.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use elemkit_common::PageLayout;

use crate::{
    ElementRange,
    iter_state::{Cursor, IterState},
    kinds::{RangeKind, SinglePositions, next_runs, rewind_runs},
};

/// A shared position predicate.
#[derive(Clone)]
pub struct PositionFilter(Arc<dyn Fn(u64) -> bool + Send + Sync>);

impl PositionFilter {
    pub fn new(predicate: impl Fn(u64) -> bool + Send + Sync + 'static) -> PositionFilter {
        PositionFilter(Arc::new(predicate))
    }

    #[inline]
    pub fn accepts(&self, pos: u64) -> bool {
        (self.0)(pos)
    }

    /// Returns `true` if both filters share the same predicate object.
    pub fn ptr_eq(&self, other: &PositionFilter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PositionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PositionFilter({:p})", Arc::as_ptr(&self.0))
    }
}

/// The positions of an inner range accepted by a predicate, in inner traversal order.
///
/// Never splittable: the predicate is evaluated in the inner range's traversal order.
#[derive(Debug, Clone)]
pub struct FilteredRange {
    inner: Box<ElementRange>,
    filter: PositionFilter,
    layout: PageLayout,
}

impl FilteredRange {
    pub fn new(inner: ElementRange, filter: PositionFilter) -> FilteredRange {
        let layout = inner.layout();
        FilteredRange {
            inner: Box::new(inner),
            filter,
            layout,
        }
    }

    pub fn inner(&self) -> &ElementRange {
        &self.inner
    }

    pub fn filter(&self) -> &PositionFilter {
        &self.filter
    }
}

impl SinglePositions for FilteredRange {
    fn single_rewind(&self, state: &mut IterState) -> Option<u64> {
        let mut inner = IterState::new();
        let run = self.inner.rewind(&mut inner).unwrap_or(0..0);
        state.reset(Cursor::Filtered {
            inner: Box::new(inner),
            run,
        });
        self.single_next(state)
    }

    fn single_next(&self, state: &mut IterState) -> Option<u64> {
        let Cursor::Filtered { inner, run } = &mut state.cursor else {
            return None;
        };
        loop {
            if let Some(pos) = run.find(|&pos| self.filter.accepts(pos)) {
                return Some(pos);
            }
            *run = self.inner.next(inner)?;
        }
    }

    fn single_layout(&self) -> PageLayout {
        self.layout
    }
}

impl RangeKind for FilteredRange {
    fn size(&self) -> u64 {
        let mut count = 0;
        let mut state = IterState::new();
        let mut run = self.rewind(&mut state);
        while let Some(r) = run {
            count += r.end - r.start;
            run = self.next(&mut state);
        }
        count
    }

    fn max_size(&self) -> u64 {
        self.inner.max_size()
    }

    fn is_empty(&self) -> bool {
        let mut state = IterState::new();
        self.rewind(&mut state).is_none()
    }

    fn is_ordered(&self) -> bool {
        self.inner.is_ordered()
    }

    fn can_contain_duplicates(&self) -> bool {
        self.inner.can_contain_duplicates()
    }

    fn allows_concurrent_deletion(&self) -> bool {
        self.inner.allows_concurrent_deletion()
    }

    fn rewind(&self, state: &mut IterState) -> Option<Range<u64>> {
        rewind_runs(self, state)
    }

    fn next(&self, state: &mut IterState) -> Option<Range<u64>> {
        next_runs(self, state)
    }
}

impl PartialEq for FilteredRange {
    fn eq(&self, other: &Self) -> bool {
        self.filter.ptr_eq(&other.filter) && self.inner == other.inner
    }
}
