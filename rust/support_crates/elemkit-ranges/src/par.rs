//! Fork-join traversal of ranges over page-aligned splits.
//!
//! A range is split recursively while it is divisible and each half is processed on the
//! rayon thread pool. Both halves of a list-backed range read the same shared buffer.
//! Runs are delivered in range order within each half, with no ordering between halves.

use std::ops::Range;

use crate::ElementRange;

/// Calls `f` for every run of `range`, splitting the work across the rayon pool.
///
/// Ranges that are not divisible are traversed serially on the calling thread.
pub fn for_each_run<F>(range: &ElementRange, f: &F)
where
    F: Fn(Range<u64>) + Sync,
{
    if !range.is_divisible() {
        log::debug!("par::for_each_run: range is not divisible, traversing serially");
    }
    for_each_run_rec(range, f);
}

fn for_each_run_rec<F>(range: &ElementRange, f: &F)
where
    F: Fn(Range<u64>) + Sync,
{
    match range.split() {
        Some((left, right)) => {
            rayon::join(|| for_each_run_rec(&left, f), || for_each_run_rec(&right, f));
        }
        None => range.runs().for_each(f),
    }
}

/// Maps every run of `range` to a value and folds the values with `reduce`.
///
/// `reduce` must be associative; `identity` is returned for an empty range.
pub fn map_reduce_runs<T, M, R>(range: &ElementRange, identity: T, map: &M, reduce: &R) -> T
where
    T: Clone + Send,
    M: Fn(Range<u64>) -> T + Sync,
    R: Fn(T, T) -> T + Sync,
{
    match range.split() {
        Some((left, right)) => {
            let right_identity = identity.clone();
            let (a, b) = rayon::join(
                move || map_reduce_runs(&left, identity, map, reduce),
                move || map_reduce_runs(&right, right_identity, map, reduce),
            );
            reduce(a, b)
        }
        None => range
            .runs()
            .fold(identity, |acc, run| reduce(acc, map(run))),
    }
}

/// Counts the positions of `range` in parallel.
pub fn count_positions(range: &ElementRange) -> u64 {
    map_reduce_runs(
        range,
        0u64,
        &|run: Range<u64>| run.end - run.start,
        &|a: u64, b: u64| a + b,
    )
}
