use std::sync::Arc;

use elemkit_common::PageLayout;
use elemkit_shared_seq::SharedSeq;

use crate::{
    CacheOrder, ElementGroup, ElementRange,
    tests::{drain, layout},
};

#[test]
fn test_cached_snapshot_is_frozen() {
    let group = Arc::new(ElementGroup::from_positions(100, [5, 6, 7, 40]));
    let live = ElementRange::group(group.clone(), PageLayout::default());
    let cached = ElementRange::cached(&live, CacheOrder::Traversal);
    assert!(cached.allows_concurrent_deletion());
    assert!(cached.is_ordered());
    assert!(!cached.can_contain_duplicates());

    let mut visited = Vec::new();
    for pos in cached.positions() {
        group.remove(pos);
        visited.push(pos);
    }
    assert_eq!(visited, vec![5, 6, 7, 40]);
    assert!(live.is_empty());
    assert_eq!(cached.size(), 4);
}

#[test]
fn test_cached_contiguous_capture_stays_trivial() {
    let inner = ElementRange::interval(10, 20, 1, PageLayout::default());
    let cached = ElementRange::cached(&inner, CacheOrder::Traversal);
    let ElementRange::Cached(c) = &cached else {
        panic!("expected a cached range");
    };
    assert!(c.list().seq().is_trivial());
    assert_eq!(cached.collect_positions(), (10..20).collect::<Vec<_>>());
}

#[test]
fn test_cached_sort_orders() {
    let seq = SharedSeq::from_vec(vec![30u64, 2, 17, 2, 5]);
    let inner = ElementRange::list(seq, PageLayout::default());

    let ascending = ElementRange::cached(&inner, CacheOrder::Ascending);
    assert_eq!(ascending.collect_positions(), vec![2, 2, 5, 17, 30]);
    assert!(ascending.can_contain_duplicates());
    assert!(ascending.is_ordered());
    let left = ascending.pages_to_range_slice(0, 1).unwrap();
    assert!(left.is_ordered());

    let descending = ElementRange::cached(&inner, CacheOrder::Descending);
    assert_eq!(descending.collect_positions(), vec![30, 17, 5, 2, 2]);
    assert!(!descending.is_ordered());

    let as_is = ElementRange::cached(&inner, CacheOrder::Traversal);
    assert_eq!(as_is.collect_positions(), vec![30, 2, 17, 2, 5]);
}

#[test]
fn test_cached_ascending_of_unique_source_is_ordered() {
    let inner = ElementRange::interval(0, 20, -3, PageLayout::default());
    let cached = ElementRange::cached(&inner, CacheOrder::Ascending);
    assert!(cached.is_ordered());
    assert!(!cached.can_contain_duplicates());
    assert_eq!(cached.collect_positions(), vec![0, 3, 6, 9, 12, 15, 18]);
}

#[test]
fn test_cached_split_keeps_kind() {
    let inner = ElementRange::interval(0, 64, 2, layout(3));
    let cached = ElementRange::cached(&inner, CacheOrder::Traversal);
    assert_eq!(cached.page_count(), 4);
    let (left, right) = cached.split().unwrap();
    assert!(matches!(left, ElementRange::Cached(_)));
    assert!(matches!(right, ElementRange::Cached(_)));
    assert_eq!(left.size(), 16);
    assert_eq!(right.size(), 16);
    assert_eq!(drain(&right)[0], 32..33);
}
