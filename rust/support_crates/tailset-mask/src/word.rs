//! Storage-word abstraction for [`WordMask`](crate::WordMask).

use std::fmt;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

/// An unsigned machine word usable as mask storage.
///
/// Implementations exist for `u16`, `u32` and `u64`. All words are at most
/// 64 bits wide, so values round-trip through `u64` losslessly; `from_u64`
/// truncates to the word width.
pub trait MaskWord:
    Copy
    + Eq
    + Ord
    + Hash
    + Default
    + fmt::Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    /// Width of the word in bits.
    const BITS: u32;
    /// The all-zeros word.
    const ZERO: Self;
    /// The all-ones word.
    const MAX: Self;

    /// Truncates `value` to the word width.
    fn from_u64(value: u64) -> Self;

    /// Widens the word to `u64`.
    fn to_u64(self) -> u64;

    fn count_ones(self) -> u32;
    fn trailing_zeros(self) -> u32;
    fn leading_zeros(self) -> u32;
}

macro_rules! impl_mask_word {
    ($($ty:ty),*) => {
        $(
            impl MaskWord for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn from_u64(value: u64) -> Self {
                    value as $ty
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn count_ones(self) -> u32 {
                    <$ty>::count_ones(self)
                }

                #[inline]
                fn trailing_zeros(self) -> u32 {
                    <$ty>::trailing_zeros(self)
                }

                #[inline]
                fn leading_zeros(self) -> u32 {
                    <$ty>::leading_zeros(self)
                }
            }
        )*
    };
}

impl_mask_word!(u16, u32, u64);
