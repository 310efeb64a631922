use std::ops::Range;

use elemkit_common::PageLayout;

use crate::{ElementRange, IterState};

mod cached_tests;
mod interval_tests;
mod par_tests;

pub(crate) fn layout(page_bits: u32) -> PageLayout {
    PageLayout::new(page_bits).unwrap()
}

pub(crate) fn drain(range: &ElementRange) -> Vec<Range<u64>> {
    range.runs().collect()
}

/// Checks that no run is empty or crosses a page boundary.
pub(crate) fn assert_runs_within_pages(range: &ElementRange) {
    let layout = range.layout();
    for run in range.runs() {
        assert!(run.start < run.end, "empty run {run:?}");
        assert!(
            layout.same_page(run.start, run.end - 1),
            "run {run:?} crosses a page boundary"
        );
    }
}

#[test]
fn test_null_range() {
    let range = ElementRange::null();
    assert!(range.is_empty());
    assert_eq!(range.size(), 0);
    assert!(!range.is_splittable());
    assert!(range.split().is_none());
    let mut state = IterState::new();
    assert_eq!(range.rewind(&mut state), None);
    assert!(state.is_exhausted());
    assert_eq!(range.next(&mut state), None);
}

#[test]
fn test_repeated_range() {
    let range = ElementRange::repeated(7, 3);
    assert_eq!(range.size(), 3);
    assert!(range.can_contain_duplicates());
    assert!(!range.is_ordered());
    assert!(!range.is_splittable());
    assert_eq!(drain(&range), vec![7..8, 7..8, 7..8]);
    assert_eq!(range.collect_positions(), vec![7, 7, 7]);

    let empty = ElementRange::repeated(7, 0);
    assert!(empty.is_empty());
    assert!(drain(&empty).is_empty());
}

#[test]
fn test_exhausted_state_is_stable() {
    let range = ElementRange::interval(0, 3, 1, PageLayout::default());
    let mut state = IterState::new();
    assert_eq!(range.rewind(&mut state), Some(0..3));
    for _ in 0..5 {
        assert_eq!(range.next(&mut state), None);
        assert!(state.is_exhausted());
    }
    assert_eq!(range.rewind(&mut state), Some(0..3));
}

#[test]
fn test_next_on_unstarted_state_rewinds() {
    let range = ElementRange::repeated(1, 2);
    let mut state = IterState::new();
    assert_eq!(range.next(&mut state), Some(1..2));
    assert_eq!(range.next(&mut state), Some(1..2));
    assert_eq!(range.next(&mut state), None);
}
