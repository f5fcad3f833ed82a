use bitlin::Gf2Word;
use smallvec::{smallvec, SmallVec};

/// Bitmask over generator row indices. Bit 0 stands for the constant row.
pub(crate) type RowMask = u128;

/// A quadratic form over GF(2) row variables, valued in `Z/4`.
///
/// For a selection mask `w` with bit 0 always set, the form evaluates to
/// `sum_j diag[j] w_j + 2 * sum_{j<k} cross(j,k) w_j w_k (mod 4)`. The
/// diagonal entries live in `Z/4`; the off-diagonal part is a symmetric
/// GF(2) matrix stored as one mask per row. Row 0 carries no off-diagonal
/// entries: since `w_0 = 1`, any coupling to row 0 folds into the diagonal.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct QuadForm {
    diag: SmallVec<[u8; 16]>,
    cross: SmallVec<[RowMask; 16]>,
}

impl QuadForm {
    pub(crate) fn with_rows(count: usize) -> Self {
        QuadForm {
            diag: smallvec![0; count],
            cross: smallvec![0; count],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.diag.len()
    }

    /// The `Z/4` diagonal entry of row `j`.
    pub fn diag(&self, j: usize) -> u8 {
        self.diag[j]
    }

    /// The GF(2) off-diagonal entry linking rows `j` and `k`.
    pub fn cross_bit(&self, j: usize, k: usize) -> bool {
        self.cross[j].bit(k)
    }

    pub(crate) fn cross_mask(&self, j: usize) -> RowMask {
        self.cross[j]
    }

    pub(crate) fn set_diag(&mut self, j: usize, value: u8) {
        self.diag[j] = value & 3;
    }

    pub(crate) fn add_diag(&mut self, j: usize, value: u8) {
        self.diag[j] = (self.diag[j] + value) & 3;
    }

    pub(crate) fn flip_cross(&mut self, j: usize, k: usize) {
        debug_assert!(j != k && j > 0 && k > 0);
        self.cross[j] ^= 1 << k;
        self.cross[k] ^= 1 << j;
    }

    /// Evaluates the form at the selection `w`, which must have bit 0 set.
    pub fn eval(&self, w: RowMask) -> u8 {
        debug_assert!(w.bit(0));
        let mut value = 0u32;
        for j in w.set_bits() {
            value += u32::from(self.diag[j]);
            // each selected unordered pair is seen from both ends, which
            // contributes exactly the factor 2 on the cross terms
            value += (self.cross[j] & w).weight() as u32;
        }
        (value & 3) as u8
    }

    /// Applies the substitution `w_j <- w_j XOR w_k` to the form.
    /// `a`-row bookkeeping is the caller's business.
    pub(crate) fn row_add(&mut self, j: usize, k: usize) {
        debug_assert!(j != k && j > 0 && k > 0);
        let coupling = if self.cross_bit(j, k) { 2 } else { 0 };
        self.diag[k] = (self.diag[k] + self.diag[j] + coupling) & 3;
        let shared = self.cross[j] & !(1 << j) & !(1 << k);
        self.cross[k] ^= shared;
        for i in shared.set_bits() {
            self.cross[i] ^= 1 << k;
        }
        if self.diag[j] & 1 == 1 {
            self.flip_cross(j, k);
        }
    }

    /// Applies the substitution `w_j <- 1 XOR w_j` to the form.
    pub(crate) fn complement(&mut self, j: usize) {
        debug_assert!(j > 0);
        self.diag[0] = (self.diag[0] + self.diag[j]) & 3;
        self.diag[j] = self.diag[j].wrapping_neg() & 3;
        for i in self.cross[j].set_bits() {
            self.diag[i] = (self.diag[i] + 2) & 3;
        }
    }

    pub(crate) fn swap(&mut self, j: usize, k: usize) {
        debug_assert!(j > 0 && k > 0);
        self.diag.swap(j, k);
        self.cross.swap(j, k);
        for mask in self.cross.iter_mut() {
            *mask = mask.swap_bits(j, k);
        }
    }

    /// Removes row `j`. Valid only when no cross term touches it, or when
    /// the caller is deliberately discarding the variable.
    pub(crate) fn delete(&mut self, j: usize) {
        debug_assert!(j > 0);
        self.diag.remove(j);
        self.cross.remove(j);
        for mask in self.cross.iter_mut() {
            *mask = mask.remove_bits(j, 1);
        }
    }

    /// Inserts `count` fresh zero rows at index `at`.
    pub(crate) fn insert_rows(&mut self, at: usize, count: usize) {
        debug_assert!(at > 0);
        for offset in 0..count {
            self.diag.insert(at + offset, 0);
            self.cross.insert(at + offset, 0);
        }
        for (index, mask) in self.cross.iter_mut().enumerate() {
            if index < at || index >= at + count {
                *mask = mask.insert_zeros(at, count);
            }
        }
    }

    /// Concatenates two forms over disjoint row variables that share the
    /// constant row: rows of `x` keep their indices, row `j >= 1` of `y`
    /// becomes row `x.len() - 1 + j`, and the constant diagonals add.
    pub(crate) fn merged(x: &QuadForm, y: &QuadForm) -> QuadForm {
        let shift = x.len() - 1;
        let mut form = QuadForm {
            diag: x.diag.clone(),
            cross: x.cross.clone(),
        };
        form.add_diag(0, y.diag[0]);
        for j in 1..y.len() {
            form.diag.push(y.diag[j]);
            form.cross.push(y.cross[j] << shift);
        }
        form
    }

    /// Adds `t * parity(selection)` to the form, `t` in `Z/4`. The mask may
    /// include bit 0, in which case the parity is complemented first.
    ///
    /// For odd `t` the lift of the GF(2) parity to `Z/4` is
    /// `t * sum w_i + 2 * sum_{i<k} w_i w_k` over the selected rows.
    pub(crate) fn add_parity_term(&mut self, t: u8, selection: RowMask) {
        let mut t = t & 3;
        let mut rows = selection;
        if rows.bit(0) {
            self.add_diag(0, t);
            t = t.wrapping_neg() & 3;
            rows &= !1;
        }
        if t == 0 {
            return;
        }
        let selected: SmallVec<[usize; 16]> = rows.set_bits().collect();
        for &i in &selected {
            self.add_diag(i, t);
        }
        if t & 1 == 1 {
            for (index, &i) in selected.iter().enumerate() {
                for &k in &selected[index + 1..] {
                    self.flip_cross(i, k);
                }
            }
        }
    }

    /// Adds `2 * parity(first) * parity(second)` to the form. Both masks may
    /// include bit 0.
    pub(crate) fn add_parity_product(&mut self, first: RowMask, second: RowMask) {
        let len = self.len();
        for i in 0..len {
            for k in i..len {
                let coefficient = if i == k {
                    first.bit(i) && second.bit(i)
                } else {
                    (first.bit(i) && second.bit(k)) != (first.bit(k) && second.bit(i))
                };
                if !coefficient {
                    continue;
                }
                if i == k {
                    self.add_diag(i, 2);
                } else if i == 0 {
                    self.add_diag(k, 2);
                } else {
                    self.flip_cross(i, k);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_all<const N: usize>(form: &QuadForm) -> Vec<u8> {
        (0..1u128 << N).map(|w| form.eval((w << 1) | 1)).collect()
    }

    #[test]
    fn eval_counts_pairs_once() {
        // q = 2 w1 w2
        let mut form = QuadForm::with_rows(3);
        form.flip_cross(1, 2);
        assert_eq!(eval_all::<2>(&form), vec![0, 0, 0, 2]);
    }

    #[test]
    fn row_add_preserves_values_under_substitution() {
        let mut form = QuadForm::with_rows(3);
        form.set_diag(1, 1);
        form.set_diag(2, 3);
        form.flip_cross(1, 2);
        let before = eval_all::<2>(&form);
        form.row_add(1, 2);
        let after = eval_all::<2>(&form);
        // w1' = w1 ^ w2, w2' = w2: index map (w1, w2) -> (w1 ^ w2, w2)
        for w1 in 0..2usize {
            for w2 in 0..2usize {
                assert_eq!(after[(w1 ^ w2) | (w2 << 1)], before[w1 | (w2 << 1)]);
            }
        }
    }

    #[test]
    fn complement_shifts_the_variable() {
        let mut form = QuadForm::with_rows(3);
        form.set_diag(1, 3);
        form.flip_cross(1, 2);
        let before = eval_all::<2>(&form);
        form.complement(1);
        let after = eval_all::<2>(&form);
        for w1 in 0..2usize {
            for w2 in 0..2usize {
                assert_eq!(after[(w1 ^ 1) | (w2 << 1)], before[w1 | (w2 << 1)]);
            }
        }
    }

    #[test]
    fn parity_term_lifts_xor() {
        // add 1 * (w1 ^ w2 ^ w3) to the zero form
        let mut form = QuadForm::with_rows(4);
        form.add_parity_term(1, 0b1110);
        for w in 0..8u128 {
            let parity = (w.count_ones() & 1) as u8;
            assert_eq!(form.eval((w << 1) | 1), parity);
        }
    }

    #[test]
    fn parity_term_with_constant_bit() {
        // add 3 * (1 ^ w1) to the zero form
        let mut form = QuadForm::with_rows(2);
        form.add_parity_term(3, 0b11);
        assert_eq!(form.eval(0b01), 3);
        assert_eq!(form.eval(0b11), 0);
    }

    #[test]
    fn parity_product_is_a_double_term() {
        // add 2 * (w1 ^ w2) * (1 ^ w2 ^ w3)
        let mut form = QuadForm::with_rows(4);
        form.add_parity_product(0b0110, 0b1101);
        for w in 0..8u128 {
            let w1 = (w & 1) as u8;
            let w2 = ((w >> 1) & 1) as u8;
            let w3 = ((w >> 2) & 1) as u8;
            let expected = 2 * ((w1 ^ w2) & (1 ^ w2 ^ w3));
            assert_eq!(form.eval((w << 1) | 1), expected, "w = {w:b}");
        }
    }
}
