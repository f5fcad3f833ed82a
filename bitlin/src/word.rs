use core::fmt::Debug;
use core::hash::Hash;
use core::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, Shr,
};

/// An unsigned machine word treated as a vector over GF(2).
///
/// Bit `i` of the word is coordinate `i` of the vector. XOR adds vectors,
/// AND restricts to a coordinate subset, and `dot` is the standard inner
/// product. Implemented for `u16`, `u32`, `u64` and `u128`.
pub trait Gf2Word:
    Copy
    + Eq
    + Hash
    + Debug
    + Default
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + BitAndAssign
    + BitOrAssign
    + BitXorAssign
    + Shl<usize, Output = Self>
    + Shr<usize, Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    const BITS: usize;

    /// The value of bit `index`.
    fn bit(self, index: usize) -> bool;

    /// The number of set bits.
    fn weight(self) -> usize;

    /// The position of the lowest set bit, or `None` for the zero word.
    fn lowest_set(self) -> Option<usize>;

    /// This word with bit `index` set to `to`.
    fn with_bit(self, index: usize, to: bool) -> Self {
        let mask = Self::ONE << index;
        if to {
            self | mask
        } else {
            self & !mask
        }
    }

    /// XOR of all bits.
    fn parity(self) -> bool {
        self.weight() & 1 == 1
    }

    /// The GF(2) inner product of two words.
    fn dot(self, other: Self) -> bool {
        (self & other).parity()
    }

    /// A word whose lowest `width` bits are set.
    fn low_mask(width: usize) -> Self {
        if width == 0 {
            Self::ZERO
        } else if width >= Self::BITS {
            !Self::ZERO
        } else {
            (!Self::ZERO) >> (Self::BITS - width)
        }
    }

    /// Shifts the bits at positions `at` and above up by `count`, leaving
    /// `count` zero bits at position `at`.
    fn insert_zeros(self, at: usize, count: usize) -> Self {
        let low = Self::low_mask(at);
        (self & low) | ((self & !low) << count)
    }

    /// Deletes the `count` bits at position `at`, shifting higher bits down.
    fn remove_bits(self, at: usize, count: usize) -> Self {
        let low = Self::low_mask(at);
        (self & low) | ((self >> count) & !low)
    }

    /// Swaps bits `i` and `j`.
    fn swap_bits(self, i: usize, j: usize) -> Self {
        if self.bit(i) != self.bit(j) {
            self ^ (Self::ONE << i) ^ (Self::ONE << j)
        } else {
            self
        }
    }

    /// Rotates the `len` bits at position `start` left by `rot` places,
    /// leaving all other bits unchanged. Bit `start + p` moves to position
    /// `start + ((p + rot) mod len)`.
    fn rotate_window(self, start: usize, len: usize, rot: usize) -> Self {
        if len == 0 {
            return self;
        }
        let rot = rot % len;
        if rot == 0 {
            return self;
        }
        let mask = Self::low_mask(len);
        let window = (self >> start) & mask;
        let rotated = ((window << rot) | (window >> (len - rot))) & mask;
        (self & !(mask << start)) | (rotated << start)
    }

    /// Iterates over the positions of the set bits, lowest first.
    fn set_bits(self) -> SetBits<Self> {
        SetBits { word: self }
    }
}

/// Iterator over the set bit positions of a word, lowest first.
pub struct SetBits<W: Gf2Word> {
    word: W,
}

impl<W: Gf2Word> Iterator for SetBits<W> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let position = self.word.lowest_set()?;
        self.word &= !(W::ONE << position);
        Some(position)
    }
}

macro_rules! implement_gf2_word {
    ($($uint:ty),*) => {
        $(
            impl Gf2Word for $uint {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const BITS: usize = <$uint>::BITS as usize;

                fn bit(self, index: usize) -> bool {
                    debug_assert!(index < <$uint>::BITS as usize);
                    (self >> index) & 1 == 1
                }

                fn weight(self) -> usize {
                    self.count_ones() as usize
                }

                fn lowest_set(self) -> Option<usize> {
                    if self == 0 {
                        None
                    } else {
                        Some(self.trailing_zeros() as usize)
                    }
                }
            }
        )*
    };
}

implement_gf2_word!(u16, u32, u64, u128);
