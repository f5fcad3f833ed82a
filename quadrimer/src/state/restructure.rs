use bitlin::Gf2Word;

use super::{GenRow, QStateMatrix, MAX_QUBITS};
use crate::error::QsError;
use crate::QsResult;

enum Side {
    Rows,
    Cols,
}

impl QStateMatrix {
    /// Shifts the qubits at positions `at` and above up by `count`,
    /// leaving `count` fresh zero columns. No generators are added, so the
    /// new qubits are pinned to 0 in the support.
    pub(crate) fn extend_bits_zero(&mut self, at: usize, count: usize) {
        for row in self.gens.iter_mut() {
            *row = row.insert_zeros(at, count);
        }
    }

    /// Like [`extend_bits_zero`], but the new qubits range freely: one
    /// fresh generator per new bit. Keeps a reduced representation
    /// reduced by inserting the generators in pivot order.
    ///
    /// [`extend_bits_zero`]: QStateMatrix::extend_bits_zero
    pub(crate) fn extend_bits_free(&mut self, at: usize, count: usize) {
        if self.is_zero() || count == 0 {
            self.extend_bits_zero(at, count);
            return;
        }
        let insert_at = if self.reduced {
            1 + self.gens[1..]
                .iter()
                .take_while(|row| matches!(row.lowest_set(), Some(pivot) if pivot < at))
                .count()
        } else {
            self.gens.len()
        };
        self.extend_bits_zero(at, count);
        for offset in 0..count {
            self.gens
                .insert(insert_at + offset, (1 as GenRow) << (at + offset));
        }
        self.form.insert_rows(insert_at, count);
    }

    /// Deletes the bit columns `at .. at + count` from every generator,
    /// which sums the represented matrix over those qubits.
    pub(crate) fn sumup_bits(&mut self, at: usize, count: usize) {
        for row in self.gens.iter_mut() {
            *row = row.remove_bits(at, count);
        }
        self.reduced = false;
    }

    /// Pins the qubits `at .. at + count` to 0: keeps only the entries
    /// whose flat index is zero on those bits. The result can be the zero
    /// matrix. Bit columns are kept (and are all zero afterwards).
    pub(crate) fn restrict_zero_bits(&mut self, at: usize, count: usize) {
        for position in at..at + count {
            if self.is_zero() {
                return;
            }
            let found = (1..self.gens.len()).find(|&i| self.gens[i].bit(position));
            let Some(pinned) = found else {
                if self.gens[0].bit(position) {
                    self.set_zero();
                    return;
                }
                continue;
            };
            if self.gens[0].bit(position) {
                self.complement(pinned);
            }
            for other in 1..self.gens.len() {
                if other != pinned && self.gens[other].bit(position) {
                    self.row_add(pinned, other);
                }
            }
            self.delete_row(pinned);
        }
        self.reduced = false;
    }

    fn classify_range(&self, at: usize, count: usize) -> QsResult<Side> {
        let cols = self.cols as usize;
        if at + count > self.width() {
            return Err(QsError::BitRange("bit range out of bounds"));
        }
        if at + count <= cols {
            Ok(Side::Cols)
        } else if at >= cols {
            Ok(Side::Rows)
        } else {
            Err(QsError::BitRange(
                "bit range straddles the row and column parts",
            ))
        }
    }

    fn grow_side(&mut self, at: usize, count: usize) -> QsResult<()> {
        let (rows, cols) = self.shape();
        let (rows, cols) = if at <= cols {
            (rows, cols + count)
        } else {
            (rows + count, cols)
        };
        if rows > MAX_QUBITS || cols > MAX_QUBITS {
            return Err(QsError::TooLarge {
                rows,
                cols,
                max: MAX_QUBITS,
            });
        }
        self.rows = rows as u8;
        self.cols = cols as u8;
        Ok(())
    }

    /// Inserts `count` fresh qubits at position `at`; the matrix is
    /// tensored with an all-ones vector on the new qubits. Entries with
    /// any value on the new qubits repeat the original entry. The new
    /// qubits join the column side when `at <= cols`, the row side
    /// otherwise.
    pub fn extend(&self, at: usize, count: usize) -> QsResult<Self> {
        if at > self.width() {
            return Err(QsError::BitRange("bit range out of bounds"));
        }
        let mut state = self.clone();
        state.grow_side(at, count)?;
        state.extend_bits_free(at, count);
        Ok(state)
    }

    /// Inserts `count` fresh qubits at position `at`; entries are kept
    /// only where the new qubits are all 0. The new qubits join the
    /// column side when `at <= cols`, the row side otherwise.
    pub fn extend_zero(&self, at: usize, count: usize) -> QsResult<Self> {
        if at > self.width() {
            return Err(QsError::BitRange("bit range out of bounds"));
        }
        let mut state = self.clone();
        state.grow_side(at, count)?;
        state.extend_bits_zero(at, count);
        Ok(state)
    }

    /// Keeps the entries whose qubits `at .. at + count` are all 0 and
    /// zeroes the rest. The shape does not change.
    pub fn restrict_zero(&self, at: usize, count: usize) -> QsResult<Self> {
        if at + count > self.width() {
            return Err(QsError::BitRange("bit range out of bounds"));
        }
        let mut state = self.clone();
        state.restrict_zero_bits(at, count);
        Ok(state)
    }

    /// Like [`restrict_zero`], but also deletes the pinned qubits,
    /// shrinking the shape by `count` on their side. The range
    /// `at .. at + count` must lie entirely on one side of the
    /// row/column boundary.
    ///
    /// [`restrict_zero`]: QStateMatrix::restrict_zero
    pub fn restrict(&self, at: usize, count: usize) -> QsResult<Self> {
        let side = self.classify_range(at, count)?;
        let mut state = self.clone();
        state.restrict_zero_bits(at, count);
        state.sumup_bits(at, count);
        state.shrink_side(side, count);
        Ok(state)
    }

    /// Sums the matrix over the qubits `at .. at + count`, which disappear
    /// from the shape. For a ket this marginalizes those qubits. The range
    /// must lie entirely on one side of the row/column boundary.
    pub fn sumup(&self, at: usize, count: usize) -> QsResult<Self> {
        let side = self.classify_range(at, count)?;
        let mut state = self.clone();
        state.sumup_bits(at, count);
        state.shrink_side(side, count);
        Ok(state)
    }

    fn shrink_side(&mut self, side: Side, count: usize) {
        match side {
            Side::Rows => self.rows -= count as u8,
            Side::Cols => self.cols -= count as u8,
        }
    }

    /// Rotates the labels of the `len` qubits starting at `start` left by
    /// `rot` places: the qubit at `start + p` moves to position
    /// `start + ((p + rot) mod len)`. A pure relabeling of flat indices.
    pub fn rot_bits(&self, rot: i32, len: usize, start: usize) -> QsResult<Self> {
        if start + len > self.width() {
            return Err(QsError::BitRange("bit range out of bounds"));
        }
        let mut state = self.clone();
        if len > 0 {
            let rot = rot.rem_euclid(len as i32) as usize;
            for row in state.gens.iter_mut() {
                *row = row.rotate_window(start, len, rot);
            }
        }
        state.reduced = false;
        Ok(state)
    }

    /// Exchanges the qubit at position `j` with the qubit at `j + shift`
    /// for every bit `j` set in `mask`. The two selections must be
    /// disjoint and in bounds.
    pub fn xch_bits(&self, shift: usize, mask: u64) -> QsResult<Self> {
        if mask == 0 {
            return Ok(self.clone());
        }
        let n = self.width();
        if shift >= n || mask >> (n - shift) != 0 {
            return Err(QsError::BitRange("exchange selection out of bounds"));
        }
        if mask & (mask << shift) != 0 {
            return Err(QsError::BitRange("exchange selections overlap"));
        }
        let mut state = self.clone();
        for j in mask.set_bits() {
            for row in state.gens.iter_mut() {
                *row = row.swap_bits(j, j + shift);
            }
        }
        state.reduced = false;
        Ok(state)
    }
}
