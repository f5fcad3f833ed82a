//! Bit-packed linear algebra over GF(2).
//!
//! A `Gf2Word` is a machine word viewed as a vector of bits; XOR is vector
//! addition and AND-then-parity is the inner product. [`Echelon`] maintains a
//! reduced row-echelon basis of such vectors with combination tracking, so
//! membership queries also recover the combination of input rows that
//! produces a target vector.

mod echelon;
mod word;

pub use echelon::Echelon;
pub use word::{Gf2Word, SetBits};
