use bitlin::Gf2Word;

use super::QStateMatrix;

impl QStateMatrix {
    /// XORs generator `j` into generator `k` and fixes the form up, which
    /// substitutes `w_j <- w_j XOR w_k` in the represented sum.
    pub(crate) fn row_add(&mut self, j: usize, k: usize) {
        debug_assert!(j != k && j > 0 && k > 0);
        self.gens[k] ^= self.gens[j];
        self.form.row_add(j, k);
    }

    /// XORs generator `j` into the offset, substituting `w_j <- 1 XOR w_j`.
    pub(crate) fn complement(&mut self, j: usize) {
        debug_assert!(j > 0);
        self.gens[0] ^= self.gens[j];
        self.form.complement(j);
    }

    pub(crate) fn swap_rows(&mut self, j: usize, k: usize) {
        self.gens.swap(j, k);
        self.form.swap(j, k);
    }

    pub(crate) fn delete_row(&mut self, j: usize) {
        self.gens.remove(j);
        self.form.delete(j);
    }

    /// Brings the generators to reduced row-echelon form: pivots are the
    /// lowest set bits, strictly increasing from generator 1 on, and every
    /// pivot column is cleared in all other rows including the offset.
    /// Dependent generators end up as all-zero rows at the bottom.
    fn echelonize(&mut self) {
        let width = self.width();
        debug_assert!(self.gens.iter().all(|&row| row >> width == 0));
        let mut next = 1;
        for position in 0..width {
            let Some(pivot_row) =
                (next..self.gens.len()).find(|&i| self.gens[i].bit(position))
            else {
                continue;
            };
            if pivot_row != next {
                self.swap_rows(next, pivot_row);
            }
            for i in 0..self.gens.len() {
                if i != next && self.gens[i].bit(position) {
                    if i == 0 {
                        self.complement(next);
                    } else {
                        self.row_add(next, i);
                    }
                }
            }
            next += 1;
        }
    }

    /// Removes the all-zero generator row `j`, accounting for the sum over
    /// its free variable `w_j`.
    ///
    /// With `d = diag(j)` and `S` the rows coupled to `j`, the inner sum is
    /// `sum_{w_j} i^(d w_j + 2 w_j P)` with `P` the parity of `S`:
    ///   - `d` even, `S` empty: the sum is `2` or `0`;
    ///   - `d` even, `S` nonempty: the sum forces `P = d/2`, a linear
    ///     constraint that removes one more generator;
    ///   - `d` odd: the sum is `1 + i^d (-1)^P = sqrt(2) zeta^(+-1) i^(-+P)`.
    fn eliminate_null_row(&mut self, j: usize) {
        debug_assert!(j > 0 && self.gens[j] == 0);
        let d = self.form.diag(j);
        let coupled = self.form.cross_mask(j);
        if d & 1 == 1 {
            let parity_scale = if d == 1 { 3 } else { 1 };
            let eighth_turns = if d == 1 { 1 } else { -1 };
            self.factor = self.factor.times_pow2(1).times_zeta(eighth_turns);
            self.form.add_parity_term(parity_scale, coupled);
            self.delete_row(j);
            return;
        }
        match coupled.lowest_set() {
            None if d == 0 => {
                self.factor = self.factor.times_pow2(2);
                self.delete_row(j);
            }
            None => self.set_zero(),
            Some(anchor) => {
                // force the parity of the coupled rows to d / 2
                for other in coupled.set_bits().skip(1) {
                    self.row_add(anchor, other);
                }
                self.factor = self.factor.times_pow2(2);
                self.delete_row(j);
                let anchor = if anchor > j { anchor - 1 } else { anchor };
                if d == 2 {
                    self.complement(anchor);
                }
                self.delete_row(anchor);
            }
        }
    }

    /// Brings the representation to canonical reduced form and returns the
    /// support rank, the number of independent generators. The zero matrix
    /// reduces to an empty representation with rank 0.
    pub fn reduce(&mut self) -> usize {
        if self.reduced || self.is_zero() {
            self.reduced = true;
            return self.num_gens();
        }
        loop {
            self.echelonize();
            let Some(null_row) = (1..self.gens.len()).find(|&i| self.gens[i] == 0) else {
                break;
            };
            self.eliminate_null_row(null_row);
            if self.is_zero() {
                return 0;
            }
        }
        let constant = self.form.diag(0);
        if constant != 0 {
            self.factor = self.factor.times_zeta(2 * i32::from(constant));
            self.form.set_diag(0, 0);
        }
        self.reduced = true;
        self.num_gens()
    }

    /// A reduced copy.
    pub fn reduced(&self) -> Self {
        let mut state = self.clone();
        state.reduce();
        state
    }

    /// The number of independent generators, after reducing a copy if the
    /// representation is not canonical yet.
    pub fn rank(&self) -> usize {
        if self.reduced {
            self.num_gens()
        } else {
            self.reduced().num_gens()
        }
    }
}
