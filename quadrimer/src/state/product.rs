use smallvec::SmallVec;

use super::{GenRow, QStateMatrix};
use crate::error::QsError;
use crate::qform::QuadForm;
use crate::scalar::Factor;
use crate::QsResult;

impl QStateMatrix {
    fn zero_of_shape(rows: usize, cols: usize) -> Self {
        QStateMatrix {
            rows: rows as u8,
            cols: cols as u8,
            gens: SmallVec::new(),
            form: QuadForm::with_rows(0),
            factor: Factor::one(),
            reduced: true,
        }
    }

    /// The entrywise product of two nonzero representations over the same
    /// `n` flat bits.
    ///
    /// The supports intersect where the offsets differ by a common span
    /// element, so the combined generators carry a difference copy in the
    /// bits above `n` which is then pinned to zero. The shape fields of
    /// the result are the caller's business.
    fn pointwise(x: &Self, y: &Self, n: usize) -> Self {
        debug_assert!(!x.is_zero() && !y.is_zero());
        debug_assert!(2 * n <= 128 && x.gens.len() + y.gens.len() <= 128);
        let mut gens: SmallVec<[GenRow; 16]> =
            SmallVec::with_capacity(x.gens.len() + y.gens.len() - 1);
        gens.push(x.gens[0] | ((x.gens[0] ^ y.gens[0]) << n));
        for &row in &x.gens[1..] {
            gens.push(row | (row << n));
        }
        for &row in &y.gens[1..] {
            gens.push(row << n);
        }
        let mut product = QStateMatrix {
            rows: x.rows,
            cols: x.cols,
            gens,
            form: QuadForm::merged(&x.form, &y.form),
            factor: x.factor.mul(y.factor),
            reduced: false,
        };
        product.restrict_zero_bits(n, n);
        if !product.is_zero() {
            // the difference block is identically zero now
            product.sumup_bits(n, n);
        }
        product
    }

    /// The matrix product `self @ other`.
    pub fn matmul(&self, other: &Self) -> QsResult<Self> {
        if self.cols != other.rows {
            return Err(QsError::shape_mismatch(
                "matmul",
                self.shape(),
                other.shape(),
            ));
        }
        Ok(self.matmul_inner(other))
    }

    /// [`matmul`] for operands already known to be compatible.
    ///
    /// Flat bits are laid out as `| left rows | inner | right cols |`; the
    /// left operand is extended freely over the right columns and vice
    /// versa, the two are multiplied pointwise and the inner qubits are
    /// summed out.
    ///
    /// [`matmul`]: QStateMatrix::matmul
    pub(crate) fn matmul_inner(&self, other: &Self) -> Self {
        debug_assert_eq!(self.cols, other.rows);
        let (out_rows, inner) = self.shape();
        let out_cols = other.shape().1;
        let mut left = self.reduced();
        let mut right = other.reduced();
        if left.is_zero() || right.is_zero() {
            return Self::zero_of_shape(out_rows, out_cols);
        }
        left.extend_bits_free(0, out_cols);
        right.extend_bits_free(out_cols + inner, out_rows);
        let n = out_cols + inner + out_rows;
        let mut product = Self::pointwise(&left, &right, n);
        product.sumup_bits(out_cols, inner);
        product.rows = out_rows as u8;
        product.cols = out_cols as u8;
        product
    }

    /// The entrywise (Hadamard) product.
    pub fn mul_elementwise(&self, other: &Self) -> QsResult<Self> {
        if self.shape() != other.shape() {
            return Err(QsError::shape_mismatch(
                "elementwise product",
                self.shape(),
                other.shape(),
            ));
        }
        let left = self.reduced();
        let right = other.reduced();
        if left.is_zero() || right.is_zero() {
            return Ok(Self::zero_of_shape(self.shape().0, self.shape().1));
        }
        let mut product = Self::pointwise(&left, &right, self.width());
        product.rows = self.rows;
        product.cols = self.cols;
        Ok(product)
    }
}
