//! The concrete range kinds wrapped by [`ElementRange`](crate::ElementRange).

use std::ops::Range;

use elemkit_common::PageLayout;

use crate::{
    ElementRange,
    iter_state::{IterState, consolidate},
};

pub mod cached;
pub mod filtered;
pub mod group;
pub mod interval;
pub mod list;
pub mod repeated;

pub use cached::{CacheOrder, CachedRange};
pub use filtered::{FilteredRange, PositionFilter};
pub use group::GroupRange;
pub use interval::IntervalRange;
pub use list::ListRange;
pub use repeated::RepeatedRange;

/// Operations every range kind provides; [`ElementRange`] dispatches to them.
pub(crate) trait RangeKind {
    fn size(&self) -> u64;

    fn max_size(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn is_ordered(&self) -> bool;

    fn can_contain_duplicates(&self) -> bool;

    fn allows_concurrent_deletion(&self) -> bool;

    fn is_splittable(&self) -> bool {
        false
    }

    fn page_count(&self) -> u64 {
        0
    }

    fn first_position_in_page(&self, _page: u64) -> Option<u64> {
        None
    }

    fn pages_to_range_slice(&self, _first_page: u64, _page_count: u64) -> Option<ElementRange> {
        None
    }

    fn rewind(&self, state: &mut IterState) -> Option<Range<u64>>;

    fn next(&self, state: &mut IterState) -> Option<Range<u64>>;
}

/// One-position-at-a-time traversal for kinds that cannot naturally produce runs.
///
/// [`rewind_runs`] and [`next_runs`] turn it into the run protocol by batching
/// contiguous positions.
pub(crate) trait SinglePositions {
    /// Positions the state on the first position and returns it.
    fn single_rewind(&self, state: &mut IterState) -> Option<u64>;

    /// Advances the state and returns the next position.
    fn single_next(&self, state: &mut IterState) -> Option<u64>;

    fn single_layout(&self) -> PageLayout;
}

pub(crate) fn rewind_runs<K: SinglePositions>(
    kind: &K,
    state: &mut IterState,
) -> Option<Range<u64>> {
    let first = kind.single_rewind(state);
    consolidate(state, kind.single_layout(), first, |s| kind.single_next(s))
}

pub(crate) fn next_runs<K: SinglePositions>(kind: &K, state: &mut IterState) -> Option<Range<u64>> {
    if state.is_unstarted() {
        return rewind_runs(kind, state);
    }
    if state.is_exhausted() {
        return None;
    }
    let first = match state.pending.take() {
        Some(pos) => Some(pos),
        None => kind.single_next(state),
    };
    consolidate(state, kind.single_layout(), first, |s| kind.single_next(s))
}

/// Returns the sub-range of `bounds` covered by `page_count` pages starting at the
/// `first_page`-th page that `bounds` touches.
pub(crate) fn page_window(
    layout: PageLayout,
    bounds: Range<u64>,
    first_page: u64,
    page_count: u64,
) -> Option<Range<u64>> {
    let pages = layout.pages_spanning(bounds.clone());
    let total = pages.end - pages.start;
    if page_count == 0 || first_page + page_count > total {
        return None;
    }
    let lo = bounds.start.max(layout.page_start(pages.start + first_page));
    let hi = bounds
        .end
        .min(layout.page_start(pages.start + first_page + page_count));
    Some(lo..hi)
}
