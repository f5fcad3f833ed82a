use bitlin::{Echelon, Gf2Word};
use num_complex::Complex64;

use super::{GenRow, QStateMatrix};

impl QStateMatrix {
    /// The value of an entry whose selection evaluates the form to `q`.
    fn amplitude(&self, q: u8) -> Complex64 {
        self.factor.times_zeta(2 * i32::from(q)).to_complex()
    }

    /// The dense complex matrix, row-major: entry `(r, c)` sits at flat
    /// index `(r << cols) | c`.
    pub fn dense(&self) -> Vec<Complex64> {
        let reduced = self.reduced();
        let mut out = vec![Complex64::new(0.0, 0.0); 1 << reduced.width()];
        if reduced.is_zero() {
            return out;
        }
        let k = reduced.num_gens();
        for selection in 0..(1u64 << k) {
            let mut point = reduced.gens[0];
            for index in selection.set_bits() {
                point ^= reduced.gens[index + 1];
            }
            let w = (GenRow::from(selection) << 1) | 1;
            out[point as usize] = reduced.amplitude(reduced.form.eval(w));
        }
        out
    }

    /// The entries at the given `(row, col)` index pairs. Index bits
    /// beyond the shape are ignored.
    pub fn entries(&self, indices: &[(u64, u64)]) -> Vec<Complex64> {
        let reduced = self.reduced();
        let zero = Complex64::new(0.0, 0.0);
        if reduced.is_zero() {
            return vec![zero; indices.len()];
        }
        let (rows, cols) = reduced.shape();
        let echelon = Echelon::new(&reduced.gens[1..], reduced.width());
        indices
            .iter()
            .map(|&(row, col)| {
                let target = (GenRow::from(row & u64::low_mask(rows)) << cols)
                    | GenRow::from(col & u64::low_mask(cols));
                match echelon.solve(target ^ reduced.gens[0]) {
                    None => zero,
                    Some(combination) => {
                        let w = (combination << 1) | 1;
                        reduced.amplitude(reduced.form.eval(w))
                    }
                }
            })
            .collect()
    }

    /// A single entry. Index bits beyond the shape are ignored.
    pub fn entry(&self, row: u64, col: u64) -> Complex64 {
        self.entries(&[(row, col)])
            .pop()
            .unwrap_or_else(|| Complex64::new(0.0, 0.0))
    }
}
