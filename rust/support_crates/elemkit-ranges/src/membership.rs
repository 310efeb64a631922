//! Live membership sources consumed by group ranges.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use elemkit_shared_seq::SharedSeq;

use crate::bit_set::AtomicBitSet;

/// An external collaborator answering "does this position belong, and in what order".
///
/// Group ranges hold a shared reference to a source and query it during traversal, so
/// they reflect its live state. Implementations must tolerate concurrent readers.
pub trait MembershipSource: Send + Sync + std::fmt::Debug {
    /// Exclusive upper bound of the positions the source can answer for.
    fn position_bound(&self) -> u64;

    fn contains(&self, pos: u64) -> bool;

    /// Number of member positions.
    fn entries(&self) -> u64;

    /// Returns the explicit member order, if the source keeps one.
    ///
    /// The returned sequence is a snapshot; sources backed by a [`SharedSeq`] return a
    /// clone that shares storage with the live order.
    fn ordered_members(&self) -> Option<SharedSeq<u64>> {
        None
    }

    /// Returns the first member in `from..until`.
    fn next_member(&self, from: u64, until: u64) -> Option<u64> {
        (from..until.min(self.position_bound())).find(|&pos| self.contains(pos))
    }

    /// Returns the first non-member in `from..until`.
    fn next_non_member(&self, from: u64, until: u64) -> Option<u64> {
        (from..until.min(self.position_bound())).find(|&pos| !self.contains(pos))
    }

    /// Counts the members in `from..until`.
    fn count_members(&self, from: u64, until: u64) -> u64 {
        (from..until.min(self.position_bound()))
            .filter(|&pos| self.contains(pos))
            .count() as u64
    }
}

/// A group of element positions, optionally remembering the order members were added in.
///
/// Membership is stored in an [`AtomicBitSet`], so members can be added or removed
/// through a shared reference while ranges over the group exist. An ordered group also
/// records its members in insertion order in a [`SharedSeq`].
#[derive(Debug)]
pub struct ElementGroup {
    bits: AtomicBitSet,
    entries: AtomicU64,
    order: Option<Mutex<SharedSeq<u64>>>,
}

impl ElementGroup {
    /// Creates an empty unordered group over `0..bound`.
    pub fn new(bound: u64) -> ElementGroup {
        ElementGroup {
            bits: AtomicBitSet::new(bound),
            entries: AtomicU64::new(0),
            order: None,
        }
    }

    /// Creates an empty group over `0..bound` that tracks insertion order.
    pub fn new_ordered(bound: u64) -> ElementGroup {
        ElementGroup {
            order: Some(Mutex::new(SharedSeq::new())),
            ..ElementGroup::new(bound)
        }
    }

    /// Creates an unordered group from a list of positions.
    pub fn from_positions(bound: u64, positions: impl IntoIterator<Item = u64>) -> ElementGroup {
        let group = ElementGroup::new(bound);
        for pos in positions {
            group.add(pos);
        }
        group
    }

    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Adds `pos` to the group. Returns `true` if it was not a member before.
    pub fn add(&self, pos: u64) -> bool {
        if self.bits.set(pos) {
            return false;
        }
        self.entries.fetch_add(1, Ordering::SeqCst);
        if let Some(order) = &self.order {
            order.lock().unwrap().push(pos);
        }
        true
    }

    /// Adds every position of `positions` to the group.
    pub fn add_range(&self, positions: std::ops::Range<u64>) {
        for pos in positions {
            self.add(pos);
        }
    }

    /// Removes `pos` from the group. Returns `true` if it was a member.
    pub fn remove(&self, pos: u64) -> bool {
        if !self.bits.reset(pos) {
            return false;
        }
        self.entries.fetch_sub(1, Ordering::SeqCst);
        if let Some(order) = &self.order {
            order.lock().unwrap().find_and_remove(pos);
        }
        true
    }

    /// Removes all members.
    pub fn clear(&self) {
        self.bits.reset_all();
        self.entries.store(0, Ordering::SeqCst);
        if let Some(order) = &self.order {
            order.lock().unwrap().clear();
        }
    }
}

impl MembershipSource for ElementGroup {
    fn position_bound(&self) -> u64 {
        self.bits.len()
    }

    fn contains(&self, pos: u64) -> bool {
        pos < self.bits.len() && self.bits.get(pos)
    }

    fn entries(&self) -> u64 {
        self.entries.load(Ordering::SeqCst)
    }

    fn ordered_members(&self) -> Option<SharedSeq<u64>> {
        self.order.as_ref().map(|order| order.lock().unwrap().clone())
    }

    fn next_member(&self, from: u64, until: u64) -> Option<u64> {
        self.bits.next_set(from, until)
    }

    fn next_non_member(&self, from: u64, until: u64) -> Option<u64> {
        self.bits.next_unset(from, until)
    }

    fn count_members(&self, from: u64, until: u64) -> u64 {
        self.bits.count_set(from, until)
    }
}
