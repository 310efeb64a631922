//! Integer-like element types storable in a [`SharedSeq`](crate::SharedSeq).

use num_traits::PrimInt;

/// An integer-like value (an index or an offset) stored in a shared sequence.
///
/// Besides the integer arithmetic provided by [`PrimInt`], a sequence value must be
/// convertible from and to a zero-based sequence position, which is what the implicit
/// `start + i` representation relies upon.
pub trait SeqValue: PrimInt + std::fmt::Debug + Send + Sync + 'static {
    /// Converts a sequence position into a value delta.
    ///
    /// The conversion is a plain cast; positions beyond the value domain are a caller
    /// precondition violation.
    fn from_index(index: usize) -> Self;

    /// Converts a non-negative value delta back into a sequence position.
    fn to_index(self) -> usize;
}

macro_rules! impl_seq_value {
    ($($t:ty),*) => {
        $(
            impl SeqValue for $t {
                #[inline(always)]
                fn from_index(index: usize) -> Self {
                    index as $t
                }

                #[inline(always)]
                fn to_index(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_seq_value!(u16, u32, u64, usize, i32, i64, isize);
