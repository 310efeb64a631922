use std::ops::Range;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use elemkit_common::PageLayout;
use elemkit_shared_seq::SharedSeq;

use crate::{
    ElementGroup, ElementRange, par,
    tests::layout,
};

#[test]
fn test_for_each_run_covers_interval() {
    let range = ElementRange::interval(0, 10_000, 1, layout(6));
    let seen = Mutex::new(Vec::new());
    par::for_each_run(&range, &|run: Range<u64>| {
        seen.lock().unwrap().extend(run);
    });
    let mut seen = seen.into_inner().unwrap();
    seen.sort_unstable();
    assert_eq!(seen, (0..10_000).collect::<Vec<_>>());
}

#[test]
fn test_for_each_run_serial_fallback() {
    let inner = ElementRange::interval(0, 1000, 1, layout(4));
    let range = ElementRange::filtered(inner, |pos| pos % 7 == 0);
    assert!(!range.is_divisible());
    let count = AtomicU64::new(0);
    par::for_each_run(&range, &|run: Range<u64>| {
        count.fetch_add(run.end - run.start, Ordering::Relaxed);
    });
    assert_eq!(count.load(Ordering::Relaxed), 143);
}

#[test]
fn test_map_reduce_sum() {
    let seq: SharedSeq<u64> = (0..5000u64).map(|i| (i * 7919) % 5000).collect();
    let range = ElementRange::list(seq, layout(5));
    let sum = par::map_reduce_runs(
        &range,
        0u64,
        &|run: Range<u64>| run.sum::<u64>(),
        &|a: u64, b: u64| a + b,
    );
    assert_eq!(sum, (0..5000u64).sum::<u64>());
}

#[test]
fn test_map_reduce_max_on_empty_range() {
    let range = ElementRange::interval(10, 10, 1, PageLayout::default());
    let max = par::map_reduce_runs(
        &range,
        None,
        &|run: Range<u64>| run.last(),
        &|a: Option<u64>, b: Option<u64>| a.max(b),
    );
    assert_eq!(max, None);
}

#[test]
fn test_count_positions_matches_size() {
    let group = Arc::new(ElementGroup::new(4096));
    for pos in (0..4096).filter(|pos| pos % 3 != 1) {
        group.add(pos);
    }
    let ranges = [
        ElementRange::interval(17, 9000, 1, layout(7)),
        ElementRange::group(group.clone(), layout(7)),
        ElementRange::group_complement(Some(group), layout(7)),
        ElementRange::repeated(3, 11),
    ];
    for range in &ranges {
        assert_eq!(par::count_positions(range), range.size());
    }
}
