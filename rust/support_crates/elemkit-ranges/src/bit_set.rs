//! A thread-safe fixed-capacity bit set used to back live group membership.

use std::sync::atomic::{AtomicU64, Ordering};

/// A fixed-length bitmap whose bits can be flipped through a shared reference.
///
/// Bit `i` is stored in word `i >> 6` at bit position `i & 63`. Writers use `SeqCst`
/// read-modify-write operations; readers and searches use `Relaxed` loads. A search
/// result reflects the state at the time each word was loaded and may be stale by the
/// time the caller acts on it, which is the expected behavior of a live membership
/// source.
pub struct AtomicBitSet {
    words: Vec<AtomicU64>,
    len: u64,
}

impl AtomicBitSet {
    /// Creates a bit set with `len` unset bits.
    pub fn new(len: u64) -> Self {
        let word_count = len.div_ceil(64) as usize;
        AtomicBitSet {
            words: (0..word_count).map(|_| AtomicU64::new(0)).collect(),
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn get(&self, index: u64) -> bool {
        assert!(index < self.len);
        let (word, bit) = self.bit_location(index);
        (word.load(Ordering::Relaxed) & (1 << bit)) != 0
    }

    /// Sets the bit at `index` and returns its previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set(&self, index: u64) -> bool {
        assert!(index < self.len);
        let (word, bit) = self.bit_location(index);
        (word.fetch_or(1 << bit, Ordering::SeqCst) & (1 << bit)) != 0
    }

    /// Clears the bit at `index` and returns its previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn reset(&self, index: u64) -> bool {
        assert!(index < self.len);
        let (word, bit) = self.bit_location(index);
        (word.fetch_and(!(1 << bit), Ordering::SeqCst) & (1 << bit)) != 0
    }

    /// Clears every bit.
    pub fn reset_all(&self) {
        for word in &self.words {
            word.store(0, Ordering::SeqCst);
        }
    }

    /// Finds the first set bit in `from..until`.
    pub fn next_set(&self, from: u64, until: u64) -> Option<u64> {
        self.find(from, until, |w| w)
    }

    /// Finds the first unset bit in `from..until`.
    pub fn next_unset(&self, from: u64, until: u64) -> Option<u64> {
        self.find(from, until, |w| !w)
    }

    /// Counts the set bits in `from..until`.
    pub fn count_set(&self, from: u64, until: u64) -> u64 {
        let until = until.min(self.len);
        if from >= until {
            return 0;
        }
        let mut count = 0u64;
        let mut pos = from;
        while pos < until {
            let word_idx = (pos >> 6) as usize;
            let bit = pos & 63;
            let span = (64 - bit).min(until - pos);
            let word = self.words[word_idx].load(Ordering::Relaxed) >> bit;
            count += u64::from((word & low_mask(span)).count_ones());
            pos += span;
        }
        count
    }

    /// Scans words in `from..until`, returning the first position whose bit is set
    /// in `transform(word)`.
    fn find(&self, from: u64, until: u64, transform: impl Fn(u64) -> u64) -> Option<u64> {
        let until = until.min(self.len);
        let mut pos = from;
        while pos < until {
            let word_idx = (pos >> 6) as usize;
            let bit = pos & 63;
            let word = transform(self.words[word_idx].load(Ordering::Relaxed)) >> bit;
            if word != 0 {
                let found = pos + u64::from(word.trailing_zeros());
                return (found < until).then_some(found);
            }
            pos += 64 - bit;
        }
        None
    }

    #[inline]
    fn bit_location(&self, index: u64) -> (&AtomicU64, u64) {
        (&self.words[(index >> 6) as usize], index & 63)
    }
}

impl std::fmt::Debug for AtomicBitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicBitSet")
            .field("len", &self.len)
            .field("set", &self.count_set(0, self.len))
            .finish()
    }
}

#[inline]
fn low_mask(bits: u64) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

#[cfg(test)]
mod tests {
    use super::AtomicBitSet;

    #[test]
    fn test_set_reset() {
        let set = AtomicBitSet::new(80);
        assert!(!set.set(0));
        assert!(set.set(0));
        assert!(set.reset(0));
        assert!(!set.get(0));
        assert!(!set.set(79));
        assert!(set.get(79));
    }

    #[test]
    fn test_next_set_and_unset() {
        let set = AtomicBitSet::new(200);
        for i in [3, 64, 65, 130, 199] {
            set.set(i);
        }
        assert_eq!(set.next_set(0, 200), Some(3));
        assert_eq!(set.next_set(4, 200), Some(64));
        assert_eq!(set.next_set(66, 200), Some(130));
        assert_eq!(set.next_set(66, 130), None);
        assert_eq!(set.next_set(131, 500), Some(199));
        assert_eq!(set.next_unset(64, 200), Some(66));
        assert_eq!(set.next_unset(3, 4), None);
        assert_eq!(set.next_unset(199, 200), None);
    }

    #[test]
    fn test_count_set() {
        let set = AtomicBitSet::new(300);
        for i in (0..300).step_by(3) {
            set.set(i);
        }
        assert_eq!(set.count_set(0, 300), 100);
        assert_eq!(set.count_set(1, 64), 21);
        assert_eq!(set.count_set(10, 10), 0);
        set.reset_all();
        assert_eq!(set.count_set(0, 300), 0);
    }
}
