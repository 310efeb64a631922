//! The position universe a range is defined over.

use elemkit_common::PageLayout;

/// Defines the valid position bounds and the page alignment of an element table.
pub trait PositionUniverse {
    /// Exclusive upper bound of valid positions.
    fn position_bound(&self) -> u64;

    fn page_layout(&self) -> PageLayout;
}

/// A plain position universe `0..bound` with a fixed page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Universe {
    bound: u64,
    layout: PageLayout,
}

impl Universe {
    pub fn new(bound: u64, layout: PageLayout) -> Universe {
        Universe { bound, layout }
    }

    /// Creates a universe with the default page layout.
    pub fn with_bound(bound: u64) -> Universe {
        Universe::new(bound, PageLayout::default())
    }
}

impl PositionUniverse for Universe {
    fn position_bound(&self) -> u64 {
        self.bound
    }

    fn page_layout(&self) -> PageLayout {
        self.layout
    }
}
