use elemkit_common::PageLayout;

use crate::{
    ElementRange, IterState, Universe,
    tests::{assert_runs_within_pages, drain, layout},
};

#[test]
fn test_interval_runs_break_at_pages() {
    let range = ElementRange::interval(10, 100, 1, layout(5));
    assert_eq!(range.size(), 90);
    assert!(range.is_ordered());
    assert!(!range.can_contain_duplicates());
    assert_eq!(drain(&range), vec![10..32, 32..64, 64..96, 96..100]);
    assert_runs_within_pages(&range);
}

#[test]
fn test_interval_split_scenario() {
    let range = ElementRange::interval(0, 100, 1, layout(5));
    assert_eq!(range.page_count(), 4);
    assert!(range.is_divisible());
    let (left, right) = range.split().unwrap();
    assert_eq!(left.size() + right.size(), 100);
    assert_eq!(left.first_position_in_page(0), Some(0));
    let right_first = right.first_position_in_page(0).unwrap();
    assert!((32..100).contains(&right_first));
    assert_eq!(right_first, 64);

    // The original is untouched and still iterable.
    assert_eq!(range.size(), 100);
    assert_eq!(range.collect_positions(), (0..100).collect::<Vec<_>>());
}

#[test]
fn test_interval_single_page_not_divisible() {
    let range = ElementRange::interval(40, 50, 1, layout(5));
    assert!(range.is_splittable());
    assert_eq!(range.page_count(), 1);
    assert!(!range.is_divisible());
    assert!(range.split().is_none());
}

#[test]
fn test_interval_pages_to_range_slice() {
    let range = ElementRange::interval(20, 200, 1, layout(5));
    // pages 0..7 touched: [20,32), [32,64), ..., [192,200)
    assert_eq!(range.page_count(), 7);
    assert_eq!(range.first_position_in_page(0), Some(20));
    assert_eq!(range.first_position_in_page(6), Some(192));
    assert_eq!(range.first_position_in_page(7), None);

    let slice = range.pages_to_range_slice(1, 2).unwrap();
    assert_eq!(slice.collect_positions(), (32..96).collect::<Vec<_>>());
    assert!(range.pages_to_range_slice(6, 2).is_none());
    assert!(range.pages_to_range_slice(0, 0).is_none());
}

#[test]
fn test_interval_with_step() {
    let range = ElementRange::interval(3, 20, 5, PageLayout::default());
    assert_eq!(range.size(), 4);
    assert!(range.is_splittable());
    assert!(!range.is_divisible());
    assert_eq!(range.collect_positions(), vec![3, 8, 13, 18]);
    assert_eq!(drain(&range), vec![3..4, 8..9, 13..14, 18..19]);
}

#[test]
fn test_interval_descending() {
    let range = ElementRange::interval(3, 20, -5, PageLayout::default());
    assert_eq!(range.size(), 4);
    assert!(!range.is_ordered());
    assert_eq!(range.collect_positions(), vec![18, 13, 8, 3]);

    let unit = ElementRange::interval(0, 4, -1, PageLayout::default());
    assert_eq!(unit.collect_positions(), vec![3, 2, 1, 0]);
}

#[test]
fn test_empty_interval() {
    let range = ElementRange::interval(5, 5, 1, PageLayout::default());
    assert!(range.is_empty());
    let mut state = IterState::new();
    assert_eq!(range.rewind(&mut state), None);
    assert_eq!(range.page_count(), 0);
}

#[test]
fn test_try_interval_rejects_bad_args() {
    assert!(ElementRange::try_interval(0, 10, 0, PageLayout::default()).is_err());
    assert!(ElementRange::try_interval(10, 0, 1, PageLayout::default()).is_err());
    assert!(ElementRange::try_interval(0, 10, 2, PageLayout::default()).is_ok());
}

#[test]
fn test_all_positions_of_universe() {
    let universe = Universe::new(3000, layout(10));
    let range = ElementRange::all(&universe);
    assert_eq!(range.size(), 3000);
    assert_eq!(range.page_count(), 3);
    assert_eq!(drain(&range), vec![0..1024, 1024..2048, 2048..3000]);
}

#[test]
fn test_restartable() {
    let range = ElementRange::interval(7, 300, 1, layout(6));
    assert_eq!(drain(&range), drain(&range));
}

#[test]
fn test_stepped_interval_splits_by_position_pages() {
    let range = ElementRange::interval(0, 4096, 2, layout(5));
    assert!(range.is_splittable());
    assert_eq!(range.page_count(), 128);
    let (left, right) = range.split().unwrap();
    assert_eq!(left.size(), 1024);
    assert_eq!(right.size(), 1024);
    assert_eq!(right.first_position_in_page(0), Some(2048));
    assert_eq!(right.collect_positions()[..3], [2048, 2050, 2052]);
}

#[test]
fn test_descending_interval_pages_in_traversal_order() {
    let range = ElementRange::interval(0, 100, -3, layout(5));
    assert_eq!(range.page_count(), 4);
    assert_eq!(range.first_position_in_page(0), Some(99));
    assert_eq!(range.first_position_in_page(1), Some(93));
    assert_eq!(range.first_position_in_page(3), Some(30));

    let (left, right) = range.split().unwrap();
    assert_eq!(left.collect_positions(), (66u32..100).step_by(3).rev().map(u64::from).collect::<Vec<_>>());
    assert_eq!(right.collect_positions(), (0u32..64).step_by(3).rev().map(u64::from).collect::<Vec<_>>());
    assert!(!left.is_ordered());
}

#[test]
fn test_wide_stride_leaves_empty_pages() {
    let range = ElementRange::interval(0, 200, 50, layout(3));
    assert_eq!(range.page_count(), 25);
    assert_eq!(range.first_position_in_page(0), Some(0));
    assert_eq!(range.first_position_in_page(1), None);
    let empty = range.pages_to_range_slice(1, 5).unwrap();
    assert!(empty.is_empty());
    let slice = range.pages_to_range_slice(6, 1).unwrap();
    assert_eq!(slice.collect_positions(), vec![50]);
}
