//! Iterators over the values of a [`SharedSeq`](crate::SharedSeq).

use crate::SeqValue;

/// Borrowing iterator over the values of a shared sequence.
///
/// The representation is resolved once when the iterator is created, so the trivial
/// case runs the `start + i` formula and the explicit case walks the raw slice.
#[derive(Clone, Debug)]
pub enum Iter<'a, V> {
    Trivial {
        start: V,
        front: usize,
        back: usize,
    },
    Slice(std::slice::Iter<'a, V>),
}

impl<V: SeqValue> Iterator for Iter<'_, V> {
    type Item = V;

    #[inline]
    fn next(&mut self) -> Option<V> {
        match self {
            Iter::Trivial { start, front, back } => {
                if *front < *back {
                    let value = *start + V::from_index(*front);
                    *front += 1;
                    Some(value)
                } else {
                    None
                }
            }
            Iter::Slice(it) => it.next().copied(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<V: SeqValue> DoubleEndedIterator for Iter<'_, V> {
    #[inline]
    fn next_back(&mut self) -> Option<V> {
        match self {
            Iter::Trivial { start, front, back } => {
                if *front < *back {
                    *back -= 1;
                    Some(*start + V::from_index(*back))
                } else {
                    None
                }
            }
            Iter::Slice(it) => it.next_back().copied(),
        }
    }
}

impl<V: SeqValue> ExactSizeIterator for Iter<'_, V> {
    #[inline]
    fn len(&self) -> usize {
        match self {
            Iter::Trivial { front, back, .. } => back - front,
            Iter::Slice(it) => it.len(),
        }
    }
}

impl<V: SeqValue> std::iter::FusedIterator for Iter<'_, V> {}
