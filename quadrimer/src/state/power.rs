use std::collections::HashMap;

use super::QStateMatrix;
use crate::error::QsError;
use crate::QsResult;

impl QStateMatrix {
    /// `log2` of the common squared singular value, or `None` for the zero
    /// matrix.
    ///
    /// Every nonzero singular value of a quadratic state matrix equals
    /// `2^(nu/2)` for one `nu`, so the Gram matrix `G` of the operand
    /// satisfies `G^2 = 2^nu G` and `nu` can be read off the canonical
    /// factors of `G` and `G^2`.
    pub fn lb_norm2(&self) -> Option<i32> {
        let reduced = self.reduced();
        if reduced.is_zero() {
            return None;
        }
        let gram = reduced.dagger().matmul_inner(&reduced).reduced();
        let gram_squared = gram.matmul_inner(&gram).reduced();
        Some((gram_squared.factor().log2() - gram.factor().log2()) / 2)
    }

    /// `log2` of the rank of the represented complex matrix, or `None` for
    /// the zero matrix. The rank of a quadratic state matrix is always a
    /// power of two.
    pub fn lb_rank(&self) -> Option<i32> {
        let reduced = self.reduced();
        let nu = reduced.lb_norm2()?;
        Some(reduced.factor().log2() + reduced.num_gens() as i32 - nu)
    }

    fn check_square(&self, operation: &'static str) -> QsResult<usize> {
        let (rows, cols) = self.shape();
        if rows != cols {
            return Err(QsError::shape_mismatch(operation, self.shape(), (rows, rows)));
        }
        Ok(rows)
    }

    /// The inverse matrix. An invertible quadratic state matrix is a
    /// scalar multiple of a unitary, so the inverse is its conjugate
    /// transpose rescaled by `2^-nu`.
    pub fn inv(&self) -> QsResult<Self> {
        let n = self.check_square("inv")? as i32;
        let reduced = self.reduced();
        let Some(nu) = reduced.lb_norm2() else {
            return Err(QsError::NotInvertible);
        };
        let lb_rank = reduced.factor().log2() + reduced.num_gens() as i32 - nu;
        if lb_rank != n {
            return Err(QsError::NotInvertible);
        }
        let mut inverse = reduced.dagger();
        inverse.factor = inverse.factor.times_pow2(-2 * nu);
        inverse.reduce();
        Ok(inverse)
    }

    /// The matrix power `self^exponent`. Negative exponents invert first.
    pub fn power(&self, exponent: i64) -> QsResult<Self> {
        self.check_square("power")?;
        if exponent < 0 {
            Ok(self.inv()?.power_unsigned(exponent.unsigned_abs()))
        } else {
            Ok(self.power_unsigned(exponent as u64))
        }
    }

    fn power_unsigned(&self, exponent: u64) -> Self {
        match exponent {
            0 => Self::unit_unchecked(self.rows as usize),
            1 => self.reduced(),
            _ => {
                let base = self.reduced();
                let mut acc = base.clone();
                let mut mask = 1u64 << (63 - exponent.leading_zeros() - 1);
                while mask > 0 {
                    acc = acc.matmul_inner(&acc);
                    acc.reduce();
                    if exponent & mask != 0 {
                        acc = acc.matmul_inner(&base);
                        acc.reduce();
                    }
                    mask >>= 1;
                }
                acc
            }
        }
    }

    /// The conjugation `g^-1 @ self @ g`.
    pub fn conjugated_by(&self, g: &Self) -> QsResult<Self> {
        g.inv()?.matmul(self)?.matmul(g)
    }

    /// The multiplicative order, searched up to `max_order` with
    /// baby-step giant-step over canonical keys. Requires an invertible
    /// matrix of finite order: the scalar factor must sit on the unit
    /// circle, otherwise no power can reach the identity.
    pub fn order(&self, max_order: usize) -> QsResult<usize> {
        let n = self.check_square("order")?;
        let reduced = self.reduced();
        let Some(nu) = reduced.lb_norm2() else {
            return Err(QsError::NotInvertible);
        };
        let lb_rank = reduced.factor().log2() + reduced.num_gens() as i32 - nu;
        if lb_rank != n as i32 {
            return Err(QsError::NotInvertible);
        }
        if nu != 0 {
            return Err(QsError::InfiniteOrder);
        }
        let unit_key = Self::unit_unchecked(n).canonical_key();
        let steps = (max_order as f64).sqrt() as usize + 2;
        let mut table = HashMap::with_capacity(steps);
        // Seed the identity at exponent zero so the giant loop can hit
        // orders that are exact multiples of the stride.
        table.insert(unit_key.clone(), 0);
        let mut current = reduced.clone();
        for baby in 1..steps {
            let key = current.canonical_key();
            if key == unit_key {
                return Ok(baby);
            }
            table.insert(key, baby);
            current = current.matmul_inner(&reduced);
            current.reduce();
        }
        // current is now self^steps
        let giant_step = current.inv()?;
        let mut giant = giant_step.clone();
        for multiple in 1..steps {
            if let Some(&baby) = table.get(&giant.canonical_key()) {
                return Ok(multiple * steps + baby);
            }
            giant = giant.matmul_inner(&giant_step);
            giant.reduce();
        }
        Err(QsError::OrderNotFound(max_order))
    }
}
