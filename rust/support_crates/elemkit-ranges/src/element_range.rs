//! The closed set of range kinds and their common API.

use std::ops::Range;
use std::sync::Arc;

use elemkit_common::{PageLayout, Result, error::Error, verify_arg};
use elemkit_shared_seq::SharedSeq;

use crate::{
    IterState,
    kinds::{
        CacheOrder, CachedRange, FilteredRange, GroupRange, IntervalRange, ListRange,
        PositionFilter, RangeKind, RepeatedRange,
    },
    membership::MembershipSource,
    query::MembershipQuery,
    universe::PositionUniverse,
};

/// A set of element positions together with an iteration order.
///
/// Ranges are value types. Cloning a list-backed range shares its [`SharedSeq`] buffer,
/// and splitting produces two new ranges without touching the original.
///
/// # Traversal
///
/// [`rewind`](Self::rewind) starts a traversal over a caller-owned [`IterState`] and
/// returns the first run; [`next`](Self::next) returns the following runs. A run is a
/// half-open interval of contiguous positions that never crosses a page boundary.
/// `None` signals exhaustion, and keeps being returned until the state is rewound.
/// [`runs`](Self::runs) and [`positions`](Self::positions) wrap the protocol as
/// iterators.
///
/// # Splitting
///
/// Splittable kinds are organized into pages. [`split`](Self::split) cuts a range at its
/// middle page into two ranges whose traversals together cover the original.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ElementRange {
    #[default]
    Null,
    Interval(IntervalRange),
    List(ListRange),
    Group(GroupRange),
    Filtered(FilteredRange),
    Repeated(RepeatedRange),
    Cached(CachedRange),
}

macro_rules! dispatch {
    ($self:expr, $kind:ident => $body:expr, null => $null:expr) => {
        match $self {
            ElementRange::Null => $null,
            ElementRange::Interval($kind) => $body,
            ElementRange::List($kind) => $body,
            ElementRange::Group($kind) => $body,
            ElementRange::Filtered($kind) => $body,
            ElementRange::Repeated($kind) => $body,
            ElementRange::Cached($kind) => $body,
        }
    };
}

impl ElementRange {
    /// The always-empty range.
    pub fn null() -> ElementRange {
        ElementRange::Null
    }

    /// All positions of the universe, in ascending order.
    pub fn all(universe: &impl PositionUniverse) -> ElementRange {
        ElementRange::interval(0, universe.position_bound(), 1, universe.page_layout())
    }

    /// Positions `start + k * |step|` within `[start, end)`; a negative step traverses
    /// them in descending order. `step` must not be zero.
    pub fn interval(start: u64, end: u64, step: i64, layout: PageLayout) -> ElementRange {
        ElementRange::Interval(IntervalRange::new(start, end, step, layout))
    }

    /// Checked variant of [`interval`](Self::interval).
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if `step` is zero or `start > end`.
    pub fn try_interval(
        start: u64,
        end: u64,
        step: i64,
        layout: PageLayout,
    ) -> Result<ElementRange> {
        verify_arg!(step, step != 0);
        verify_arg!(start, start <= end);
        Ok(ElementRange::interval(start, end, step, layout))
    }

    /// The positions stored in `seq`, in list order.
    pub fn list(seq: SharedSeq<u64>, layout: PageLayout) -> ElementRange {
        let len = seq.len();
        ElementRange::List(ListRange::new(seq, 0..len, layout))
    }

    /// The positions stored in `seq[window]`, in list order.
    pub fn list_window(
        seq: SharedSeq<u64>,
        window: Range<usize>,
        layout: PageLayout,
    ) -> ElementRange {
        ElementRange::List(ListRange::new(seq, window, layout))
    }

    /// Checked variant of [`list_window`](Self::list_window).
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the window is reversed or exceeds the
    /// sequence length.
    pub fn try_list(
        seq: SharedSeq<u64>,
        window: Range<usize>,
        layout: PageLayout,
    ) -> Result<ElementRange> {
        verify_arg!(window, window.start <= window.end);
        verify_arg!(window, window.end <= seq.len());
        Ok(ElementRange::list_window(seq, window, layout))
    }

    /// The live members of `source`.
    pub fn group(source: Arc<dyn MembershipSource>, layout: PageLayout) -> ElementRange {
        ElementRange::Group(GroupRange::new(Some(source), false, layout))
    }

    /// The live non-members of `source`, reported as unordered.
    ///
    /// Without a source the complement is empty rather than the whole universe, since
    /// the universe bound is unknown.
    pub fn group_complement(
        source: Option<Arc<dyn MembershipSource>>,
        layout: PageLayout,
    ) -> ElementRange {
        ElementRange::Group(GroupRange::new(source, true, layout))
    }

    /// The positions of `inner` accepted by `predicate`.
    pub fn filtered(
        inner: ElementRange,
        predicate: impl Fn(u64) -> bool + Send + Sync + 'static,
    ) -> ElementRange {
        ElementRange::Filtered(FilteredRange::new(inner, PositionFilter::new(predicate)))
    }

    /// `pos` repeated `count` times.
    pub fn repeated(pos: u64, count: u64) -> ElementRange {
        ElementRange::Repeated(RepeatedRange::new(pos, count))
    }

    /// Captures the positions of `inner` into a private list, optionally sorted.
    pub fn cached(inner: &ElementRange, order: CacheOrder) -> ElementRange {
        ElementRange::Cached(CachedRange::new(inner, order))
    }

    /// The page layout the range was built with.
    pub fn layout(&self) -> PageLayout {
        match self {
            ElementRange::Null | ElementRange::Repeated(_) => PageLayout::default(),
            ElementRange::Interval(r) => r.layout(),
            ElementRange::List(r) => r.layout(),
            ElementRange::Group(r) => r.layout(),
            ElementRange::Filtered(r) => r.inner().layout(),
            ElementRange::Cached(r) => r.list().layout(),
        }
    }

    pub fn is_empty(&self) -> bool {
        dispatch!(self, r => r.is_empty(), null => true)
    }

    /// Exact number of positions, counting duplicates.
    pub fn size(&self) -> u64 {
        dispatch!(self, r => r.size(), null => 0)
    }

    /// Fast upper bound of [`size`](Self::size).
    pub fn max_size(&self) -> u64 {
        dispatch!(self, r => r.max_size(), null => 0)
    }

    /// Returns `true` if traversal follows ascending position order.
    pub fn is_ordered(&self) -> bool {
        dispatch!(self, r => r.is_ordered(), null => true)
    }

    pub fn can_contain_duplicates(&self) -> bool {
        dispatch!(self, r => r.can_contain_duplicates(), null => false)
    }

    /// Returns `true` if visited elements may be deleted from the backing store while
    /// the traversal continues.
    pub fn allows_concurrent_deletion(&self) -> bool {
        dispatch!(self, r => r.allows_concurrent_deletion(), null => true)
    }

    pub fn is_splittable(&self) -> bool {
        dispatch!(self, r => r.is_splittable(), null => false)
    }

    /// Returns `true` if the range is splittable and spans more than one page.
    pub fn is_divisible(&self) -> bool {
        self.is_splittable() && self.page_count() > 1
    }

    /// Number of disjoint pages the range is organized into; zero when not splittable.
    pub fn page_count(&self) -> u64 {
        dispatch!(self, r => r.page_count(), null => 0)
    }

    /// Returns the first position of the `page`-th page of the range.
    pub fn first_position_in_page(&self, page: u64) -> Option<u64> {
        dispatch!(self, r => r.first_position_in_page(page), null => None)
    }

    /// Returns a range covering exactly `page_count` pages starting at the
    /// `first_page`-th page, sharing backing storage where possible.
    ///
    /// Returns `None` if the range is not splittable or the pages are out of bounds.
    pub fn pages_to_range_slice(&self, first_page: u64, page_count: u64) -> Option<ElementRange> {
        dispatch!(self, r => r.pages_to_range_slice(first_page, page_count), null => None)
    }

    /// Checked variant of [`pages_to_range_slice`](Self::pages_to_range_slice).
    ///
    /// # Errors
    ///
    /// Returns an `InvalidOperation` error if the range is not splittable, and an
    /// `InvalidArgument` error if the pages are empty or out of bounds.
    pub fn try_pages_to_range_slice(
        &self,
        first_page: u64,
        page_count: u64,
    ) -> Result<ElementRange> {
        if !self.is_splittable() {
            return Err(Error::invalid_operation(
                "pages_to_range_slice on a range that is not splittable",
            ));
        }
        verify_arg!(page_count, page_count > 0);
        verify_arg!(
            first_page,
            first_page.saturating_add(page_count) <= self.page_count()
        );
        self.pages_to_range_slice(first_page, page_count)
            .ok_or_else(|| Error::invalid_arg("first_page", "page has no slice"))
    }

    /// Splits the range at its middle page.
    ///
    /// Returns `None` when the range is not divisible; callers fall back to serial
    /// traversal.
    pub fn split(&self) -> Option<(ElementRange, ElementRange)> {
        if !self.is_divisible() {
            return None;
        }
        let pages = self.page_count();
        let mid = pages / 2;
        let left = self.pages_to_range_slice(0, mid)?;
        let right = self.pages_to_range_slice(mid, pages - mid)?;
        Some((left, right))
    }

    /// Starts a traversal and returns the first run.
    pub fn rewind(&self, state: &mut IterState) -> Option<Range<u64>> {
        dispatch!(self, r => r.rewind(state), null => state.finish())
    }

    /// Returns the next run of a traversal started with [`rewind`](Self::rewind).
    ///
    /// Calling `next` on an unstarted state behaves like `rewind`.
    pub fn next(&self, state: &mut IterState) -> Option<Range<u64>> {
        dispatch!(self, r => r.next(state), null => state.finish())
    }

    /// Returns an iterator over the runs of a fresh traversal.
    pub fn runs(&self) -> Runs<'_> {
        Runs {
            range: self,
            state: IterState::new(),
        }
    }

    /// Returns an iterator over the positions of a fresh traversal.
    pub fn positions(&self) -> Positions<'_> {
        Positions {
            runs: self.runs(),
            current: 0..0,
        }
    }

    pub fn collect_positions(&self) -> Vec<u64> {
        let mut positions = Vec::with_capacity(self.max_size().min(1 << 20) as usize);
        for run in self.runs() {
            positions.extend(run);
        }
        positions
    }

    /// Builds a containment helper over the range's current positions.
    pub fn alloc_membership_query(&self) -> MembershipQuery {
        MembershipQuery::build(self)
    }
}

impl From<IntervalRange> for ElementRange {
    fn from(range: IntervalRange) -> Self {
        ElementRange::Interval(range)
    }
}

impl From<ListRange> for ElementRange {
    fn from(range: ListRange) -> Self {
        ElementRange::List(range)
    }
}

/// Iterator over the runs of an [`ElementRange`].
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    range: &'a ElementRange,
    state: IterState,
}

impl Iterator for Runs<'_> {
    type Item = Range<u64>;

    fn next(&mut self) -> Option<Range<u64>> {
        if self.state.is_unstarted() {
            self.range.rewind(&mut self.state)
        } else {
            self.range.next(&mut self.state)
        }
    }
}

impl std::iter::FusedIterator for Runs<'_> {}

/// Iterator over the positions of an [`ElementRange`].
#[derive(Debug, Clone)]
pub struct Positions<'a> {
    runs: Runs<'a>,
    current: Range<u64>,
}

impl Iterator for Positions<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            if let Some(pos) = self.current.next() {
                return Some(pos);
            }
            self.current = self.runs.next()?;
        }
    }
}
