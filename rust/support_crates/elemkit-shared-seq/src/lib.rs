//! A copy-on-write, reference-counted sequence of integer-like values with an implicit
//! ("trivial") arithmetic representation.
//!
//! [`SharedSeq`] holds either:
//! - an arithmetic run `start, start + 1, ..., start + len - 1` without any backing
//!   storage, or
//! - an explicit buffer shared through an `Arc<Vec<V>>`, which may be referenced by any
//!   number of sequences at once.
//!
//! Cloning is O(1) in both cases. A mutation of an explicit sequence first makes its
//! buffer private (clone-on-write), and a mutation that breaks the arithmetic pattern of
//! a trivial sequence first materializes it ("hardens" it).
//!
//! The representation is a plain enum: the discriminant and its payload are always
//! replaced together, and any transition requires `&mut self`, so a reader of a
//! sequence can never observe a half-transitioned state.

use std::fmt;
use std::sync::Arc;

use elemkit_common::{Result, error::Error};

pub mod iter;
pub mod value;


pub use iter::Iter;
pub use value::SeqValue;

/// A copy-on-write sequence of integer-like values with an O(1) representation for
/// arithmetic runs.
///
/// See the [crate-level documentation](crate) for an overview.
#[derive(Clone)]
pub struct SharedSeq<V> {
    repr: Repr<V>,
    /// Auxiliary caller-defined bit, independent of the representation.
    flag: bool,
}

#[derive(Clone)]
enum Repr<V> {
    /// Value at position `i` is `start + i`.
    Trivial { start: V, len: usize },
    /// Explicit values, possibly shared with other sequences.
    /// `Vec::len` is the logical length and `Vec::capacity` the buffer capacity.
    Explicit(Arc<Vec<V>>),
}

impl<V: SeqValue> SharedSeq<V> {
    /// Creates an empty, trivial sequence.
    pub fn new() -> Self {
        Self::trivial(V::zero(), 0)
    }

    /// Creates a trivial sequence representing `start, start + 1, ..., start + len - 1`.
    pub fn trivial(start: V, len: usize) -> Self {
        SharedSeq {
            repr: Repr::Trivial { start, len },
            flag: false,
        }
    }

    /// Creates an empty explicit sequence with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        SharedSeq {
            repr: Repr::Explicit(Arc::new(Vec::with_capacity(capacity))),
            flag: false,
        }
    }

    /// Creates an explicit sequence that owns `vec`.
    ///
    /// The sequence is not demoted to the trivial representation even if the values
    /// form an arithmetic run; see [`compute_trivial`](Self::compute_trivial).
    pub fn from_vec(vec: Vec<V>) -> Self {
        SharedSeq {
            repr: Repr::Explicit(Arc::new(vec)),
            flag: false,
        }
    }

    /// Returns the number of values in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Trivial { len, .. } => *len,
            Repr::Explicit(buf) => buf.len(),
        }
    }

    /// Returns `true` if the sequence holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capacity of the backing buffer, or the length for a trivial sequence.
    #[inline]
    pub fn capacity(&self) -> usize {
        match &self.repr {
            Repr::Trivial { len, .. } => *len,
            Repr::Explicit(buf) => buf.capacity(),
        }
    }

    /// Returns `true` if the sequence uses the implicit arithmetic representation.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        matches!(self.repr, Repr::Trivial { .. })
    }

    /// Returns the first value of the arithmetic run for a trivial sequence.
    #[inline]
    pub fn trivial_start(&self) -> Option<V> {
        match &self.repr {
            Repr::Trivial { start, .. } => Some(*start),
            Repr::Explicit(_) => None,
        }
    }

    /// Returns the number of sequences sharing the backing buffer.
    ///
    /// A trivial sequence owns no buffer and always reports 1.
    pub fn ref_count(&self) -> usize {
        match &self.repr {
            Repr::Trivial { .. } => 1,
            Repr::Explicit(buf) => Arc::strong_count(buf),
        }
    }

    /// Returns `true` if both sequences reference the same backing buffer.
    ///
    /// Trivial sequences never share a buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Explicit(a), Repr::Explicit(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    #[inline]
    pub fn extra_flag(&self) -> bool {
        self.flag
    }

    #[inline]
    pub fn set_extra_flag(&mut self, flag: bool) {
        self.flag = flag;
    }

    /// Returns the value at position `index`.
    ///
    /// `index` must be less than `len()`. The bound is only checked in debug builds
    /// for trivial sequences; explicit sequences panic on out-of-bounds access.
    #[inline]
    pub fn get(&self, index: usize) -> V {
        match &self.repr {
            Repr::Trivial { start, len } => {
                debug_assert!(index < *len, "index {index} out of bounds ({len})");
                *start + V::from_index(index)
            }
            Repr::Explicit(buf) => buf[index],
        }
    }

    /// Checked variant of [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Returns an `OutOfBounds` error if `index >= len()`.
    pub fn try_get(&self, index: usize) -> Result<V> {
        if index < self.len() {
            Ok(self.get(index))
        } else {
            Err(Error::out_of_bounds(index, self.len()))
        }
    }

    pub fn first(&self) -> Option<V> {
        if self.is_empty() {
            None
        } else {
            Some(self.get(0))
        }
    }

    pub fn last(&self) -> Option<V> {
        let len = self.len();
        if len == 0 { None } else { Some(self.get(len - 1)) }
    }

    /// Returns the explicit values, or `None` for a trivial sequence.
    #[inline]
    pub fn explicit_slice(&self) -> Option<&[V]> {
        match &self.repr {
            Repr::Trivial { .. } => None,
            Repr::Explicit(buf) => Some(buf.as_slice()),
        }
    }

    /// Returns an iterator over the values in order.
    pub fn iter(&self) -> Iter<'_, V> {
        match &self.repr {
            Repr::Trivial { start, len } => Iter::Trivial {
                start: *start,
                front: 0,
                back: *len,
            },
            Repr::Explicit(buf) => Iter::Slice(buf.iter()),
        }
    }

    /// Applies `visit` to every value in order.
    ///
    /// The representation is checked once, followed by a tight loop over either the
    /// arithmetic formula or the raw buffer.
    #[inline]
    pub fn for_each(&self, mut visit: impl FnMut(V)) {
        match &self.repr {
            Repr::Trivial { start, len } => {
                let start = *start;
                for i in 0..*len {
                    visit(start + V::from_index(i));
                }
            }
            Repr::Explicit(buf) => {
                for &value in buf.iter() {
                    visit(value);
                }
            }
        }
    }

    pub fn to_vec(&self) -> Vec<V> {
        match &self.repr {
            Repr::Trivial { .. } => self.iter().collect(),
            Repr::Explicit(buf) => buf.as_ref().clone(),
        }
    }

    /// Returns the position of the first occurrence of `value` at or after `start_at`.
    ///
    /// Linear scan for explicit sequences, O(1) for trivial ones.
    pub fn find(&self, value: V, start_at: usize) -> Option<usize> {
        match &self.repr {
            Repr::Trivial { start, len } => {
                trivial_position(*start, *len, value).filter(|&index| index >= start_at)
            }
            Repr::Explicit(buf) => buf
                .get(start_at..)?
                .iter()
                .position(|&v| v == value)
                .map(|index| index + start_at),
        }
    }

    /// Binary search for `value` at or after `start_at`.
    ///
    /// The sequence must be sorted in ascending order; the result is unspecified
    /// otherwise. When the value occurs multiple times, any of the matching positions
    /// may be returned.
    pub fn find_sorted(&self, value: V, start_at: usize) -> Option<usize> {
        match &self.repr {
            Repr::Trivial { .. } => self.find(value, start_at),
            Repr::Explicit(buf) => buf
                .get(start_at..)?
                .binary_search(&value)
                .ok()
                .map(|index| index + start_at),
        }
    }

    #[inline]
    pub fn contains(&self, value: V) -> bool {
        self.find(value, 0).is_some()
    }

    /// Replaces the value at position `index`.
    ///
    /// A trivial sequence stays trivial when `value` matches the arithmetic pattern, or
    /// when it holds a single value. Otherwise the sequence is materialized first.
    pub fn set(&mut self, index: usize, value: V) {
        if let Repr::Trivial { start, len } = &mut self.repr {
            debug_assert!(index < *len, "index {index} out of bounds ({len})");
            if *start + V::from_index(index) == value {
                return;
            }
            if *len == 1 {
                *start = value;
                return;
            }
        }
        self.make_mut(0)[index] = value;
    }

    /// Appends `value` to the end of the sequence.
    ///
    /// Appending the next value of an arithmetic run keeps the sequence trivial.
    pub fn push(&mut self, value: V) {
        if let Repr::Trivial { start, len } = &mut self.repr {
            if *len == 0 {
                *start = value;
                *len = 1;
                return;
            }
            if start.checked_add(&V::from_index(*len)) == Some(value) {
                *len += 1;
                return;
            }
        }
        let vec = self.make_mut(0);
        reserve_one(vec);
        vec.push(value);
    }

    /// Inserts `value` at position `index`, shifting later values up.
    ///
    /// Returns `index`. `index` must not exceed `len()`.
    pub fn insert(&mut self, index: usize, value: V) -> usize {
        let len = self.len();
        debug_assert!(index <= len, "insert index {index} beyond length {len}");
        if index == len {
            self.push(value);
            return index;
        }
        if let Repr::Trivial { start, len } = &mut self.repr {
            if index == 0 && start.checked_sub(&V::one()) == Some(value) {
                *start = value;
                *len += 1;
                return index;
            }
        }
        let vec = self.make_mut(0);
        reserve_one(vec);
        vec.insert(index, value);
        index
    }

    /// Inserts `count` zero values at position `index`, shifting later values up.
    ///
    /// Returns `index`.
    pub fn multiple_insert(&mut self, index: usize, count: usize) -> usize {
        let len = self.len();
        debug_assert!(index <= len, "insert index {index} beyond length {len}");
        if count == 0 {
            return index;
        }
        let vec = self.make_mut(len + count);
        vec.splice(index..index, std::iter::repeat_n(V::zero(), count));
        index
    }

    /// Removes the value at position `index`, shifting later values down.
    ///
    /// Returns `Some(index)`, or `None` if `index` is out of bounds. Removing the first
    /// or the last value of a trivial sequence keeps it trivial.
    pub fn remove(&mut self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        match &mut self.repr {
            Repr::Trivial { start, len } => {
                if *len == 1 {
                    *len = 0;
                    return Some(index);
                }
                if index == 0 {
                    *start = *start + V::one();
                    *len -= 1;
                    return Some(index);
                }
                if index + 1 == *len {
                    *len -= 1;
                    return Some(index);
                }
            }
            Repr::Explicit(_) => (),
        }
        self.make_mut(0).remove(index);
        Some(index)
    }

    /// Removes the first occurrence of `value`.
    ///
    /// Returns the position it was removed from, or `None` if not found.
    pub fn find_and_remove(&mut self, value: V) -> Option<usize> {
        let index = self.find(value, 0)?;
        self.remove(index)
    }

    /// Removes every occurrence of `value`, returning the number of removed values.
    ///
    /// A shared buffer is left untouched when `value` does not occur.
    pub fn remove_all(&mut self, value: V) -> usize {
        if self.is_trivial() {
            return usize::from(self.find_and_remove(value).is_some());
        }
        if !self.contains(value) {
            return 0;
        }
        let vec = self.make_mut(0);
        let before = vec.len();
        vec.retain(|&v| v != value);
        before - vec.len()
    }

    /// Removes all values, resetting to an empty trivial sequence.
    ///
    /// The extra flag is preserved.
    pub fn clear(&mut self) {
        self.set_trivial(V::zero(), 0);
    }

    /// Shortens the sequence to `len` values. Has no effect if `len >= self.len()`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len() {
            return;
        }
        if new_len == 0 {
            self.clear();
            return;
        }
        match &mut self.repr {
            Repr::Trivial { len, .. } => *len = new_len,
            Repr::Explicit(buf) => match Arc::get_mut(buf) {
                Some(vec) => vec.truncate(new_len),
                None => *buf = Arc::new(buf[..new_len].to_vec()),
            },
        }
    }

    /// Resizes the sequence to `new_len`, filling new slots with `fill`.
    pub fn set_len(&mut self, new_len: usize, fill: V) {
        let len = self.len();
        if new_len <= len {
            self.truncate(new_len);
            return;
        }
        if self.is_trivial() {
            for _ in len..new_len {
                self.push(fill);
            }
            return;
        }
        self.make_mut(new_len).resize(new_len, fill);
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a != b {
            self.make_mut(0).swap(a, b);
        }
    }

    pub fn reverse(&mut self) {
        if self.len() > 1 {
            self.make_mut(0).reverse();
        }
    }

    /// Sorts the values in ascending order.
    ///
    /// A trivial sequence is already ascending and is left as is.
    pub fn sort_ascending(&mut self) {
        if !self.is_trivial() {
            self.make_mut(0).sort_unstable();
        }
    }

    /// Sorts the values in descending order.
    pub fn sort_descending(&mut self) {
        if self.len() > 1 {
            self.make_mut(0).sort_unstable_by(|a, b| b.cmp(a));
        }
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&V, &V) -> std::cmp::Ordering) {
        if self.len() > 1 {
            self.make_mut(0).sort_by(compare);
        }
    }

    /// Sorts the values in ascending order and removes duplicates.
    ///
    /// Returns the new length.
    pub fn sort_and_remove_duplicates(&mut self) -> usize {
        if !self.is_trivial() {
            let vec = self.make_mut(0);
            vec.sort_unstable();
            vec.dedup();
        }
        self.len()
    }

    /// Materializes the sequence into a private explicit buffer.
    pub fn harden(&mut self) {
        self.harden_with_capacity(0);
    }

    /// Materializes the sequence into a private explicit buffer with room for at least
    /// `min_capacity` values.
    ///
    /// - A trivial sequence allocates a buffer and fills it with its arithmetic run.
    /// - A shared explicit buffer is copied into a fresh private one.
    /// - A private buffer with insufficient capacity is grown in place.
    ///
    /// Afterwards the sequence is explicit, `ref_count() == 1` and
    /// `capacity() >= max(len(), min_capacity)`.
    pub fn harden_with_capacity(&mut self, min_capacity: usize) {
        self.make_mut(min_capacity);
    }

    /// Replaces the contents with the trivial run `start, ..., start + len - 1`,
    /// releasing any buffer reference. The extra flag is preserved.
    pub fn set_trivial(&mut self, start: V, len: usize) {
        self.repr = Repr::Trivial { start, len };
    }

    /// Same as [`set_trivial`](Self::set_trivial), also replacing the extra flag.
    pub fn set_trivial_with_flag(&mut self, start: V, len: usize, flag: bool) {
        self.set_trivial(start, len);
        self.flag = flag;
    }

    /// Converts an explicit sequence whose values form an arithmetic run back into the
    /// trivial representation, releasing its buffer.
    ///
    /// Returns `true` if the sequence is trivial afterwards.
    pub fn compute_trivial(&mut self) -> bool {
        let Repr::Explicit(buf) = &self.repr else {
            return true;
        };
        let Some(&start) = buf.first() else {
            self.set_trivial(V::zero(), 0);
            return true;
        };
        let is_run = buf
            .windows(2)
            .all(|w| w[0].checked_add(&V::one()) == Some(w[1]));
        if is_run {
            let len = buf.len();
            log::trace!("SharedSeq: demoting explicit run of {len} values to trivial");
            self.set_trivial(start, len);
        }
        is_run
    }

    /// Returns the values as a mutable slice, materializing a private buffer first.
    pub fn as_mut_slice(&mut self) -> &mut [V] {
        self.make_mut(0).as_mut_slice()
    }

    /// Ensures an explicit, private buffer with at least `min_capacity` slots and
    /// returns it.
    fn make_mut(&mut self, min_capacity: usize) -> &mut Vec<V> {
        match &mut self.repr {
            Repr::Trivial { start, len } => {
                let (start, len) = (*start, *len);
                let mut vec = Vec::with_capacity(min_capacity.max(len));
                vec.extend((0..len).map(|i| start + V::from_index(i)));
                log::trace!("SharedSeq: materializing trivial run of {len} values");
                self.repr = Repr::Explicit(Arc::new(vec));
            }
            Repr::Explicit(buf) => {
                if Arc::get_mut(buf).is_none() {
                    let len = buf.len();
                    let mut vec = Vec::with_capacity(min_capacity.max(len));
                    vec.extend_from_slice(buf);
                    log::trace!(
                        "SharedSeq: copying shared buffer of {len} values (refs: {})",
                        Arc::strong_count(buf)
                    );
                    *buf = Arc::new(vec);
                }
            }
        }
        let Repr::Explicit(buf) = &mut self.repr else {
            unreachable!("sequence must be explicit after materialization");
        };
        let vec = Arc::make_mut(buf);
        if vec.capacity() < min_capacity {
            vec.reserve_exact(min_capacity - vec.len());
        }
        vec
    }
}

/// Returns the position of `value` within the run `start..start + len`.
#[inline]
fn trivial_position<V: SeqValue>(start: V, len: usize, value: V) -> Option<usize> {
    if value < start {
        return None;
    }
    let index = (value - start).to_index();
    (index < len).then_some(index)
}

/// Geometric growth step used when an explicit buffer runs out of capacity.
#[inline]
fn bump_capacity(current: usize) -> usize {
    if current < 4 {
        4
    } else if current < 16 {
        current * 2
    } else {
        current + current / 2
    }
}

#[inline]
fn reserve_one<V>(vec: &mut Vec<V>) {
    if vec.len() == vec.capacity() {
        let target = bump_capacity(vec.capacity());
        vec.reserve_exact(target - vec.len());
    }
}

impl<V: SeqValue> Default for SharedSeq<V> {
    fn default() -> Self {
        SharedSeq::new()
    }
}

impl<V: SeqValue> PartialEq for SharedSeq<V> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Trivial { start: s0, len: l0 }, Repr::Trivial { start: s1, len: l1 }) => {
                l0 == l1 && (*l0 == 0 || s0 == s1)
            }
            (Repr::Explicit(a), Repr::Explicit(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => self.len() == other.len() && self.iter().eq(other.iter()),
        }
    }
}

impl<V: SeqValue> Eq for SharedSeq<V> {}

impl<V: SeqValue> fmt::Debug for SharedSeq<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Trivial { start, len } => f
                .debug_struct("SharedSeq")
                .field("start", start)
                .field("len", len)
                .field("flag", &self.flag)
                .finish(),
            Repr::Explicit(buf) => f
                .debug_struct("SharedSeq")
                .field("values", buf.as_ref())
                .field("flag", &self.flag)
                .finish(),
        }
    }
}

impl<'a, V: SeqValue> IntoIterator for &'a SharedSeq<V> {
    type Item = V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: SeqValue> FromIterator<V> for SharedSeq<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut seq = SharedSeq::new();
        seq.extend(iter);
        seq
    }
}

impl<V: SeqValue> Extend<V> for SharedSeq<V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<V: SeqValue> From<Vec<V>> for SharedSeq<V> {
    fn from(vec: Vec<V>) -> Self {
        SharedSeq::from_vec(vec)
    }
}

impl<V: SeqValue> From<&[V]> for SharedSeq<V> {
    fn from(slice: &[V]) -> Self {
        SharedSeq::from_vec(slice.to_vec())
    }
}

impl<V: SeqValue> From<std::ops::Range<V>> for SharedSeq<V> {
    fn from(range: std::ops::Range<V>) -> Self {
        if range.start >= range.end {
            SharedSeq::new()
        } else {
            SharedSeq::trivial(range.start, (range.end - range.start).to_index())
        }
    }
}
