use bitlin::Gf2Word;

use super::{GenRow, QStateMatrix};
use crate::error::QsError;
use crate::qform::RowMask;
use crate::QsResult;

/// Gate application. A gate `G` acts by `G @ self` on the row qubits and by
/// `self @ G` on the column qubits; since all gates here are diagonal-ish
/// bit maps, both actions take the same closed form on the representation
/// and a selector `v` may mix row and column qubits freely.
impl QStateMatrix {
    fn selector(&self, v: u64) -> GenRow {
        GenRow::from(v) & GenRow::low_mask(self.width())
    }

    /// Bit `i` of the result is the parity of `selector` against generator
    /// row `i`, with the offset as row 0.
    fn parity_rows(&self, selector: GenRow) -> RowMask {
        let mut mask: RowMask = 0;
        for (i, &row) in self.gens.iter().enumerate() {
            if (row & selector).parity() {
                mask |= 1 << i;
            }
        }
        mask
    }

    fn refold_constant(&mut self) {
        let constant = self.form.diag(0);
        if constant != 0 {
            self.factor = self.factor.times_zeta(2 * i32::from(constant));
            self.form.set_diag(0, 0);
        }
    }

    pub(crate) fn apply_not(&mut self, v: u64) {
        if self.is_zero() {
            return;
        }
        let v = self.selector(v);
        self.gens[0] ^= v;
        if self.reduced {
            // restore offset normalization against the pivots
            for i in 1..self.gens.len() {
                if let Some(pivot) = self.gens[i].lowest_set() {
                    if self.gens[0].bit(pivot) {
                        self.complement(i);
                    }
                }
            }
            self.refold_constant();
        }
    }

    pub(crate) fn apply_ctrl_not(&mut self, vc: u64, v: u64) -> QsResult<()> {
        let vc = self.selector(vc);
        let v = self.selector(v);
        if (vc & v).parity() {
            return Err(QsError::NotUnitary);
        }
        if self.is_zero() {
            return Ok(());
        }
        for row in self.gens.iter_mut() {
            if (*row & vc).parity() {
                *row ^= v;
            }
        }
        self.reduced = false;
        Ok(())
    }

    pub(crate) fn apply_phi(&mut self, v: u64, phi: i32) {
        if self.is_zero() {
            return;
        }
        let selected = self.parity_rows(self.selector(v));
        self.form.add_parity_term(phi.rem_euclid(4) as u8, selected);
        self.refold_constant();
    }

    pub(crate) fn apply_ctrl_phi(&mut self, v1: u64, v2: u64) {
        if self.is_zero() {
            return;
        }
        let first = self.parity_rows(self.selector(v1));
        let second = self.parity_rows(self.selector(v2));
        self.form.add_parity_product(first, second);
        self.refold_constant();
    }

    /// Applies a Hadamard to every qubit selected by `v`.
    ///
    /// Per qubit: adjoin a fresh output bit, multiply by `(-1)^(in * out)`
    /// and sum the input bit away, at the cost of one factor `sqrt(2)`.
    pub(crate) fn apply_h(&mut self, v: u64) {
        if self.is_zero() {
            return;
        }
        let v = self.selector(v);
        for qubit in v.set_bits() {
            self.extend_bits_free(qubit, 1);
            let first = self.parity_rows(1 << qubit);
            let second = self.parity_rows(1 << (qubit + 1));
            self.form.add_parity_product(first, second);
            self.sumup_bits(qubit + 1, 1);
            self.factor = self.factor.times_pow2(-1);
        }
    }

    /// Flips the qubits selected by `v`: entry `t` moves to `t XOR v`.
    pub fn gate_not(&self, v: u64) -> Self {
        let mut state = self.clone();
        state.apply_not(v);
        state
    }

    /// Flips the qubits in `v` on the entries of odd parity against
    /// `vc`. Requires `<vc, v> = 0`, otherwise the map is not invertible
    /// and [`QsError::NotUnitary`] is returned.
    pub fn gate_ctrl_not(&self, vc: u64, v: u64) -> QsResult<Self> {
        let mut state = self.clone();
        state.apply_ctrl_not(vc, v)?;
        Ok(state)
    }

    /// Multiplies the entries of odd parity against `v` by `i^phi`.
    pub fn gate_phi(&self, v: u64, phi: i32) -> Self {
        let mut state = self.clone();
        state.apply_phi(v, phi);
        state
    }

    /// Multiplies entry `t` by `(-1)^(<v1, t> <v2, t>)`.
    pub fn gate_ctrl_phi(&self, v1: u64, v2: u64) -> Self {
        let mut state = self.clone();
        state.apply_ctrl_phi(v1, v2);
        state
    }

    /// Applies a Hadamard to every qubit selected by `v`.
    pub fn gate_h(&self, v: u64) -> Self {
        let mut state = self.clone();
        state.apply_h(v);
        state
    }
}
