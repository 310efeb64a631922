//! Caller-owned traversal state for the `rewind`/`next` run protocol.

use std::ops::Range;

use elemkit_common::PageLayout;
use elemkit_shared_seq::SharedSeq;

/// Resumable traversal cursor for [`ElementRange::rewind`] and [`ElementRange::next`].
///
/// A state starts out unstarted; `rewind` positions it on the first run and `next`
/// advances it. Once the range is exhausted, `next` keeps reporting `None` until the
/// state is rewound again.
///
/// [`ElementRange::rewind`]: crate::ElementRange::rewind
/// [`ElementRange::next`]: crate::ElementRange::next
#[derive(Debug, Clone, Default)]
pub struct IterState {
    pub(crate) cursor: Cursor,
    /// Single position pulled ahead by the run consolidator.
    pub(crate) pending: Option<u64>,
}

impl IterState {
    pub fn new() -> IterState {
        IterState::default()
    }

    pub fn is_unstarted(&self) -> bool {
        matches!(self.cursor, Cursor::Unstarted)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.cursor, Cursor::Exhausted)
    }

    pub(crate) fn reset(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.pending = None;
    }

    /// Marks the state exhausted and reports the end of traversal.
    pub(crate) fn finish(&mut self) -> Option<Range<u64>> {
        self.reset(Cursor::Exhausted);
        None
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) enum Cursor {
    #[default]
    Unstarted,
    Exhausted,
    /// Next position to yield and the number of positions left.
    Interval { pos: u64, remaining: u64 },
    /// Next list index to yield.
    List { index: usize },
    /// Next universe position to scan from.
    GroupScan { pos: u64 },
    /// Snapshot of an ordered group, the next index into it and the end of the window.
    GroupOrdered {
        members: SharedSeq<u64>,
        index: usize,
        end: usize,
    },
    /// Inner traversal state and the unconsumed part of the current inner run.
    Filtered {
        inner: Box<IterState>,
        run: Range<u64>,
    },
    /// Repetitions left to yield.
    Repeated { remaining: u64 },
}

/// Batches a one-position-at-a-time stream into maximal contiguous runs.
///
/// `first` produces the first position of the run; `pull` produces the positions after
/// it. A position that does not extend the run (not contiguous, or past the page
/// boundary) is buffered in `state.pending` and starts the next run.
pub(crate) fn consolidate(
    state: &mut IterState,
    layout: PageLayout,
    first: Option<u64>,
    mut pull: impl FnMut(&mut IterState) -> Option<u64>,
) -> Option<Range<u64>> {
    let Some(start) = first else {
        return state.finish();
    };
    let page_end = layout.page_end_after(start);
    let mut end = start + 1;
    while end < page_end {
        match pull(state) {
            Some(pos) if pos == end => end += 1,
            Some(pos) => {
                debug_assert!(state.pending.is_none());
                state.pending = Some(pos);
                return Some(start..end);
            }
            None => return Some(start..end),
        }
    }
    Some(start..end)
}
