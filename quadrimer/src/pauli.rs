//! Pauli group elements as quadratic state matrices.
//!
//! An `n`-qubit Pauli operator `i^t X(x) Z(z)` is packed into a Pauli
//! vector: bits `[0, n)` hold the `Z` mask, bits `[n, 2n)` the `X` mask and
//! bits `[2n, 2n + 2)` the exponent `t` of `i`.

use bitlin::Gf2Word;

use crate::error::QsError;
use crate::state::{QStateMatrix, MAX_QUBITS};
use crate::QsResult;

fn unpack(n: usize, v: u64) -> QsResult<(u64, u64, u64)> {
    if 2 * n + 2 > 64 {
        return Err(QsError::BadPayload("too many qubits for a Pauli vector"));
    }
    if v >> (2 * n + 2) != 0 {
        return Err(QsError::BadPayload("stray bits in Pauli vector"));
    }
    let z = v & u64::low_mask(n);
    let x = (v >> n) & u64::low_mask(n);
    let t = (v >> (2 * n)) & 3;
    Ok((z, x, t))
}

fn pack(n: usize, z: u64, x: u64, t: u64) -> u64 {
    z | (x << n) | ((t & 3) << (2 * n))
}

/// The Pauli vector of the product of two Pauli operators on `n` qubits.
pub fn pauli_vector_mul(n: usize, v1: u64, v2: u64) -> QsResult<u64> {
    let (z1, x1, t1) = unpack(n, v1)?;
    let (z2, x2, t2) = unpack(n, v2)?;
    // commuting Z(z1) past X(x2) costs (-1)^<z1, x2>
    let t = t1 + t2 + 2 * u64::from(z1.dot(x2));
    Ok(pack(n, z1 ^ z2, x1 ^ x2, t))
}

/// The Pauli vector of a power of a Pauli operator on `n` qubits.
pub fn pauli_vector_exp(n: usize, v: u64, exponent: i64) -> QsResult<u64> {
    let (z, x, t) = unpack(n, v)?;
    // the square is the scalar i^(2t + 2<z, x>), so exponents act mod 4
    let square = 2 * t + 2 * u64::from(z.dot(x));
    Ok(match exponent.rem_euclid(4) {
        0 => 0,
        1 => v,
        2 => pack(n, 0, 0, square),
        _ => pack(n, z, x, t + square),
    })
}

impl QStateMatrix {
    /// The matrix of the Pauli operator packed in `v`.
    pub fn pauli(n: usize, v: u64) -> QsResult<Self> {
        if n > MAX_QUBITS {
            return Err(QsError::TooLarge {
                rows: n,
                cols: n,
                max: MAX_QUBITS,
            });
        }
        let (z, x, t) = unpack(n, v)?;
        let mut state = Self::unit_unchecked(n);
        state.apply_phi(z, 2);
        state.apply_not(x << n);
        state.factor = state.factor.times_zeta(2 * t as i32);
        state.reduce();
        Ok(state)
    }

    /// Recovers the Pauli vector of a matrix that is a Pauli operator,
    /// including its `i^t` prefactor. Any other matrix, or one carrying a
    /// scalar off the fourth roots of unity, is rejected.
    pub fn pauli_vector(&self) -> QsResult<u64> {
        let reduced = self.reduced();
        let (rows, cols) = reduced.shape();
        let n = rows;
        let in_group = rows == cols
            && !reduced.is_zero()
            && reduced.num_gens() == n
            && reduced.factor().log2() == 0
            && reduced.factor().phase() & 1 == 0
            && reduced.gens[0] & u128::low_mask(n) == 0
            && (1..=n).all(|i| {
                reduced.gens[i] == (1 << (i - 1)) | (1 << (n + i - 1))
                    && reduced.form.diag(i) & 1 == 0
                    && reduced.form.cross_mask(i) == 0
            });
        if !in_group {
            return Err(QsError::NotInPauliGroup);
        }
        let mut z = 0u64;
        for i in 1..=n {
            z |= u64::from(reduced.form.diag(i) >> 1) << (i - 1);
        }
        let x = (reduced.gens[0] >> n) as u64;
        let t = u64::from(reduced.factor().phase() >> 1);
        Ok(pack(n, z, x, t))
    }
}
