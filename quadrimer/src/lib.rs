//! Quadratic state matrices.
//!
//! A [`QStateMatrix`] is an exact, bit-packed representation of a
//! `2^r x 2^c` complex matrix whose support is an affine GF(2) subspace and
//! whose entries on that support are powers of `i` weighted by a quadratic
//! form, all scaled by a common factor `2^(e/2) * zeta^p` with
//! `zeta = exp(i*pi/4)`. Matrices of this shape are closed under products,
//! tensor-style restructuring and Clifford-type gate conjugation, which makes
//! the type a workhorse for exact stabilizer-flavoured linear algebra on up
//! to 12 row and 12 column qubits.
//!
//! The representation stores an affine offset, a list of GF(2) generators and
//! a quadratic form over the generator indices. [`QStateMatrix::reduce`]
//! brings it to a canonical echelonized form, so equality of matrices is
//! decidable by comparing [`CanonicalKey`]s.

mod builder;
mod display;
mod error;
mod pauli;
mod qform;
mod scalar;
mod state;

pub use builder::StateBuilder;
pub use error::QsError;
pub use pauli::{pauli_vector_exp, pauli_vector_mul};
pub use qform::QuadForm;
pub use scalar::Factor;
pub use state::{CanonicalKey, Payload, QStateMatrix, TriangleMode, MAX_QUBITS};

/// Shorthand for results carrying a [`QsError`].
pub type QsResult<T> = Result<T, QsError>;
