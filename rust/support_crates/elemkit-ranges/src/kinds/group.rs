//! Ranges over the live members of an external group.

use std::ops::Range;
use std::sync::Arc;

use elemkit_common::PageLayout;

use crate::{
    ElementRange,
    iter_state::{Cursor, IterState},
    kinds::{RangeKind, SinglePositions, next_runs, page_window, rewind_runs},
    membership::MembershipSource,
};

/// The members of a [`MembershipSource`] (or, in complement mode, the non-members)
/// within a position window.
///
/// Group ranges are live: every traversal queries the source as it is at that time.
///
/// - A source without an explicit member order is scanned in ascending position order.
///   Such ranges split by position pages of their window.
/// - A source with an explicit member order is traversed in that order, from a snapshot
///   taken at `rewind`. Such ranges are paged by chunks of the member order, the way
///   list ranges are, and split into windows over it.
/// - The complement is always scanned, and reports itself as unordered. A complement
///   built without a source has an empty window and yields nothing.
#[derive(Debug, Clone)]
pub struct GroupRange {
    source: Option<Arc<dyn MembershipSource>>,
    window: Range<u64>,
    /// Window into the explicit member order; `None` covers all of it.
    order_window: Option<Range<usize>>,
    complement: bool,
    layout: PageLayout,
}

impl GroupRange {
    pub fn new(
        source: Option<Arc<dyn MembershipSource>>,
        complement: bool,
        layout: PageLayout,
    ) -> GroupRange {
        let bound = source.as_ref().map_or(0, |s| s.position_bound());
        GroupRange {
            source,
            window: 0..bound,
            order_window: None,
            complement,
            layout,
        }
    }

    pub fn source(&self) -> Option<&Arc<dyn MembershipSource>> {
        self.source.as_ref()
    }

    pub fn window(&self) -> Range<u64> {
        self.window.clone()
    }

    pub fn is_complement(&self) -> bool {
        self.complement
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    fn has_explicit_order(&self) -> bool {
        !self.complement
            && self
                .source
                .as_ref()
                .is_some_and(|s| s.ordered_members().is_some())
    }

    /// Clamps the order window to an explicit order of `len` members.
    fn order_bounds(&self, len: usize) -> Range<usize> {
        match &self.order_window {
            None => 0..len,
            Some(w) => w.start.min(len)..w.end.min(len),
        }
    }

    fn order_index_bounds(&self) -> Option<Range<u64>> {
        let members = self.source.as_ref()?.ordered_members()?;
        let bounds = self.order_bounds(members.len());
        Some(bounds.start as u64..bounds.end as u64)
    }

    fn window_len(&self) -> u64 {
        self.window.end - self.window.start
    }

    /// Scans forward from the cursor for the next run of wanted positions.
    fn scan(&self, source: &dyn MembershipSource, state: &mut IterState) -> Option<Range<u64>> {
        let Cursor::GroupScan { pos } = &mut state.cursor else {
            return None;
        };
        let until = self.window.end;
        let found = if self.complement {
            source.next_non_member(*pos, until)
        } else {
            source.next_member(*pos, until)
        };
        let Some(start) = found else {
            return state.finish();
        };
        let limit = until.min(self.layout.page_end_after(start));
        let end = if self.complement {
            source.next_member(start + 1, limit)
        } else {
            source.next_non_member(start + 1, limit)
        }
        .unwrap_or(limit);
        *pos = end;
        Some(start..end)
    }
}

impl SinglePositions for GroupRange {
    fn single_rewind(&self, state: &mut IterState) -> Option<u64> {
        let members = self.source.as_ref()?.ordered_members()?;
        let bounds = self.order_bounds(members.len());
        state.reset(Cursor::GroupOrdered {
            members,
            index: bounds.start,
            end: bounds.end,
        });
        self.single_next(state)
    }

    fn single_next(&self, state: &mut IterState) -> Option<u64> {
        let Cursor::GroupOrdered {
            members,
            index,
            end,
        } = &mut state.cursor
        else {
            return None;
        };
        while *index < *end {
            let pos = members.get(*index);
            *index += 1;
            if self.window.contains(&pos) {
                return Some(pos);
            }
        }
        None
    }

    fn single_layout(&self) -> PageLayout {
        self.layout
    }
}

impl RangeKind for GroupRange {
    fn size(&self) -> u64 {
        let Some(source) = &self.source else {
            return 0;
        };
        if self.complement {
            return self.window_len() - source.count_members(self.window.start, self.window.end);
        }
        match source.ordered_members() {
            Some(members) => {
                let bounds = self.order_bounds(members.len());
                members
                    .iter()
                    .skip(bounds.start)
                    .take(bounds.len())
                    .filter(|pos| self.window.contains(pos))
                    .count() as u64
            }
            None if self.window == (0..source.position_bound()) => source.entries(),
            None => source.count_members(self.window.start, self.window.end),
        }
    }

    fn max_size(&self) -> u64 {
        match &self.source {
            None => 0,
            Some(_) if self.complement => self.window_len(),
            Some(source) => source.entries().min(self.window_len()),
        }
    }

    fn is_empty(&self) -> bool {
        let mut state = IterState::new();
        self.rewind(&mut state).is_none()
    }

    fn is_ordered(&self) -> bool {
        !self.complement && !self.has_explicit_order()
    }

    fn can_contain_duplicates(&self) -> bool {
        false
    }

    fn allows_concurrent_deletion(&self) -> bool {
        false
    }

    fn is_splittable(&self) -> bool {
        true
    }

    fn page_count(&self) -> u64 {
        let bounds = if self.has_explicit_order() {
            self.order_index_bounds().unwrap_or(0..0)
        } else {
            self.window.clone()
        };
        let pages = self.layout.pages_spanning(bounds);
        pages.end - pages.start
    }

    fn first_position_in_page(&self, page: u64) -> Option<u64> {
        if self.has_explicit_order() {
            let members = self.source.as_ref()?.ordered_members()?;
            let bounds = self.order_bounds(members.len());
            let indices = page_window(
                self.layout,
                bounds.start as u64..bounds.end as u64,
                page,
                1,
            )?;
            return Some(members.get(indices.start as usize));
        }
        page_window(self.layout, self.window.clone(), page, 1).map(|w| w.start)
    }

    fn pages_to_range_slice(&self, first_page: u64, page_count: u64) -> Option<ElementRange> {
        let mut slice = self.clone();
        if self.has_explicit_order() {
            let bounds = self.order_index_bounds()?;
            let indices = page_window(self.layout, bounds, first_page, page_count)?;
            slice.order_window = Some(indices.start as usize..indices.end as usize);
        } else {
            slice.window = page_window(self.layout, self.window.clone(), first_page, page_count)?;
        }
        Some(ElementRange::Group(slice))
    }

    fn rewind(&self, state: &mut IterState) -> Option<Range<u64>> {
        let Some(source) = &self.source else {
            return state.finish();
        };
        if self.has_explicit_order() {
            return rewind_runs(self, state);
        }
        state.reset(Cursor::GroupScan {
            pos: self.window.start,
        });
        self.scan(source.as_ref(), state)
    }

    fn next(&self, state: &mut IterState) -> Option<Range<u64>> {
        let Some(source) = &self.source else {
            return state.finish();
        };
        match state.cursor {
            Cursor::Unstarted => self.rewind(state),
            Cursor::GroupOrdered { .. } => next_runs(self, state),
            _ => self.scan(source.as_ref(), state),
        }
    }
}

impl PartialEq for GroupRange {
    fn eq(&self, other: &Self) -> bool {
        let same_source = match (&self.source, &other.source) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_source
            && self.window == other.window
            && self.order_window == other.order_window
            && self.complement == other.complement
            && self.layout == other.layout
    }
}
