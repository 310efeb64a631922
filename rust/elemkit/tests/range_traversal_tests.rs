use std::ops::Range;
use std::sync::{Arc, Mutex};

use elemkit::common::PageLayout;
use elemkit::support::ranges::{
    CacheOrder, ElementGroup, ElementRange, IterState, Universe, par,
};
use elemkit::support::shared_seq::SharedSeq;

#[test]
fn test_list_range_over_shared_buffer() {
    let mut positions = SharedSeq::<u64>::new();
    positions.extend([4, 5, 6, 10, 11]);
    let range = ElementRange::list(positions.clone(), PageLayout::default());

    // Editing the caller's copy does not affect the range.
    positions.set(0, 100);
    assert_eq!(range.collect_positions(), vec![4, 5, 6, 10, 11]);

    let mut state = IterState::new();
    assert_eq!(range.rewind(&mut state), Some(4..7));
    assert_eq!(range.next(&mut state), Some(10..12));
    assert_eq!(range.next(&mut state), None);
}

#[test]
fn test_delete_while_traversing_cached_group() {
    let universe = Universe::new(5000, PageLayout::new(8).unwrap());
    let group = Arc::new(ElementGroup::new(5000));
    group.add_range(100..2100);
    let live = ElementRange::group(group.clone(), PageLayout::new(8).unwrap());
    assert!(!live.allows_concurrent_deletion());

    let cached = ElementRange::cached(&live, CacheOrder::Traversal);
    assert!(cached.allows_concurrent_deletion());
    for run in cached.runs() {
        for pos in run {
            group.remove(pos);
        }
    }
    assert!(live.is_empty());

    let rest = ElementRange::group_complement(Some(group), PageLayout::new(8).unwrap());
    assert_eq!(rest.size(), ElementRange::all(&universe).size());
}

#[test]
fn test_parallel_traversal_of_all_positions() {
    let universe = Universe::new(100_000, PageLayout::default());
    let range = ElementRange::all(&universe);
    assert_eq!(par::count_positions(&range), 100_000);

    let pages = Mutex::new(Vec::new());
    par::for_each_run(&range, &|run: Range<u64>| {
        pages.lock().unwrap().push(run.start >> 10);
    });
    let mut pages = pages.into_inner().unwrap();
    pages.sort_unstable();
    assert_eq!(pages, (0..98).collect::<Vec<_>>());
}

#[test]
fn test_split_halves_on_separate_threads() {
    let seq: SharedSeq<u64> = (0..4096u64).map(|i| i * 2).collect();
    let range = ElementRange::list(seq, PageLayout::new(9).unwrap());
    let (left, right) = range.split().unwrap();
    let (a, b) = rayon::join(|| left.collect_positions(), || right.collect_positions());
    assert_eq!(a.len() + b.len(), 4096);
    assert_eq!(a.last().map(|&pos| pos < b[0]), Some(true));
}
