//! A single position repeated a number of times.

use std::ops::Range;

use elemkit_common::PageLayout;

use crate::{
    iter_state::{Cursor, IterState},
    kinds::{RangeKind, SinglePositions, next_runs, rewind_runs},
};

/// Yields `pos` exactly `count` times, one single-position run each.
///
/// Lets per-element operations be driven through the range interface for broadcast
/// scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatedRange {
    pos: u64,
    count: u64,
}

impl RepeatedRange {
    pub fn new(pos: u64, count: u64) -> RepeatedRange {
        RepeatedRange { pos, count }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl SinglePositions for RepeatedRange {
    fn single_rewind(&self, state: &mut IterState) -> Option<u64> {
        if self.count == 0 {
            state.reset(Cursor::Repeated { remaining: 0 });
            return None;
        }
        state.reset(Cursor::Repeated {
            remaining: self.count - 1,
        });
        Some(self.pos)
    }

    fn single_next(&self, state: &mut IterState) -> Option<u64> {
        let Cursor::Repeated { remaining } = &mut state.cursor else {
            return None;
        };
        if *remaining == 0 {
            return None;
        }
        *remaining -= 1;
        Some(self.pos)
    }

    fn single_layout(&self) -> PageLayout {
        PageLayout::default()
    }
}

impl RangeKind for RepeatedRange {
    fn size(&self) -> u64 {
        self.count
    }

    fn max_size(&self) -> u64 {
        self.count
    }

    fn is_ordered(&self) -> bool {
        self.count <= 1
    }

    fn can_contain_duplicates(&self) -> bool {
        self.count > 1
    }

    fn allows_concurrent_deletion(&self) -> bool {
        false
    }

    fn rewind(&self, state: &mut IterState) -> Option<Range<u64>> {
        rewind_runs(self, state)
    }

    fn next(&self, state: &mut IterState) -> Option<Range<u64>> {
        next_runs(self, state)
    }
}
