use bitlin::{Echelon, Gf2Word};
use num_complex::Complex64;
use rand::Rng;
use smallvec::{smallvec, SmallVec};

use crate::builder::StateBuilder;
use crate::error::QsError;
use crate::qform::QuadForm;
use crate::scalar::Factor;
use crate::QsResult;

mod entries;
mod gates;
mod power;
mod product;
mod reduce;
mod restructure;

/// One affine point of the support, or one GF(2) generator. Col qubits
/// occupy the low bits, row qubits sit above them; transient widths during
/// products can reach twice the public limit.
pub(crate) type GenRow = u128;

/// Largest supported number of row qubits and of column qubits.
pub const MAX_QUBITS: usize = 12;

/// How the bit-packed quadratic block of a generator payload is read.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TriangleMode {
    /// Entries on or below the diagonal are authoritative.
    LowerTriangular,
    /// Entries on or above the diagonal are authoritative.
    UpperTriangular,
    /// Both halves must be present and agree.
    SymmetricRequired,
}

/// Initial contents for [`QStateMatrix::with_payload`].
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
    /// The zero matrix.
    Empty,
    /// A basis vector, for shapes with zero rows or zero columns.
    BasisIndex(u64),
    /// Bit-packed affine generators with a quadratic block.
    Generators {
        data: &'a [u64],
        mode: TriangleMode,
    },
    /// A copy of an existing matrix, reshaped to the requested shape.
    CopyOf(&'a QStateMatrix),
}

/// A `2^rows x 2^cols` complex matrix in quadratic state representation.
///
/// The entry at flat index `t = (r << cols) | c` is nonzero exactly when
/// `t = gens[0] XOR (sum of a subset of gens[1..])`; its value is
/// `2^(e/2) * zeta^p * i^Q(w)` where `w` selects the subset and `Q` is the
/// stored quadratic form. The zero matrix has no generator rows at all.
#[derive(Clone, Debug)]
pub struct QStateMatrix {
    pub(crate) rows: u8,
    pub(crate) cols: u8,
    /// Empty for the zero matrix; otherwise `gens[0]` is the affine offset
    /// and `gens[1..]` span the support.
    pub(crate) gens: SmallVec<[GenRow; 16]>,
    pub(crate) form: QuadForm,
    pub(crate) factor: Factor,
    pub(crate) reduced: bool,
}

/// The canonical content of a reduced matrix. Two matrices are equal as
/// complex matrices if and only if their keys are equal, so the key is fit
/// for hashing in lookup tables.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CanonicalKey {
    rows: u8,
    cols: u8,
    gens: Vec<GenRow>,
    form: QuadForm,
    factor: Factor,
}

fn check_shape(rows: usize, cols: usize) -> QsResult<()> {
    if rows > MAX_QUBITS || cols > MAX_QUBITS {
        return Err(QsError::TooLarge {
            rows,
            cols,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

impl QStateMatrix {
    /// The zero matrix of the given shape.
    pub fn zero(rows: usize, cols: usize) -> QsResult<Self> {
        check_shape(rows, cols)?;
        Ok(QStateMatrix {
            rows: rows as u8,
            cols: cols as u8,
            gens: SmallVec::new(),
            form: QuadForm::with_rows(0),
            factor: Factor::one(),
            reduced: true,
        })
    }

    /// The identity matrix on `n` qubits.
    pub fn unit(n: usize) -> QsResult<Self> {
        check_shape(n, n)?;
        Ok(Self::unit_unchecked(n))
    }

    pub(crate) fn unit_unchecked(n: usize) -> Self {
        let mut gens: SmallVec<[GenRow; 16]> = smallvec![0];
        for i in 0..n {
            gens.push((1 << i) | (1 << (n + i)));
        }
        QStateMatrix {
            rows: n as u8,
            cols: n as u8,
            gens,
            form: QuadForm::with_rows(n + 1),
            factor: Factor::one(),
            reduced: true,
        }
    }

    /// A basis (co)vector: the shape must have zero rows or zero columns.
    pub fn basis(rows: usize, cols: usize, index: u64) -> QsResult<Self> {
        check_shape(rows, cols)?;
        if rows != 0 && cols != 0 {
            return Err(QsError::BadPayload("a basis state needs a vector shape"));
        }
        let n = rows + cols;
        if n < 64 && index >> n != 0 {
            return Err(QsError::BadPayload("basis index out of range"));
        }
        Ok(QStateMatrix {
            rows: rows as u8,
            cols: cols as u8,
            gens: smallvec![GenRow::from(index)],
            form: QuadForm::with_rows(1),
            factor: Factor::one(),
            reduced: true,
        })
    }

    /// Builds a matrix from bit-packed generator rows.
    ///
    /// Row `j` of `data` holds an affine generator in its low `rows + cols`
    /// bits (row 0 is the offset) and row `j` of the quadratic bit matrix
    /// `Q` in the next `data.len()` bits. The represented entries are
    /// `i^(w Q w^T)` over the affine span. The result is reduced.
    pub fn from_generators(
        rows: usize,
        cols: usize,
        data: &[u64],
        mode: TriangleMode,
    ) -> QsResult<Self> {
        check_shape(rows, cols)?;
        if data.is_empty() {
            return Self::zero(rows, cols);
        }
        let n = rows + cols;
        let count = data.len();
        if n + count > 64 {
            return Err(QsError::BadPayload("generator payload too wide"));
        }
        for &word in data {
            if (n + count) < 64 && word >> (n + count) != 0 {
                return Err(QsError::BadPayload(
                    "stray bits beyond the quadratic block",
                ));
            }
        }
        let q = |j: usize, k: usize| data[j].bit(n + k);
        let q_entry = |j: usize, k: usize| -> QsResult<bool> {
            Ok(match mode {
                TriangleMode::LowerTriangular => q(j.max(k), j.min(k)),
                TriangleMode::UpperTriangular => q(j.min(k), j.max(k)),
                TriangleMode::SymmetricRequired => {
                    if q(j, k) != q(k, j) {
                        return Err(QsError::BadPayload("quadratic block is not symmetric"));
                    }
                    q(j, k)
                }
            })
        };
        let mask = u64::low_mask(n);
        let mut gens: SmallVec<[GenRow; 16]> = SmallVec::with_capacity(count);
        let mut form = QuadForm::with_rows(count);
        for (j, &word) in data.iter().enumerate() {
            gens.push(GenRow::from(word & mask));
            let mut diag = u8::from(q_entry(j, j)?);
            if j > 0 {
                diag += 2 * u8::from(q_entry(0, j)?);
                for k in 1..count {
                    if k != j && q_entry(j, k)? && k > j {
                        form.flip_cross(j, k);
                    }
                }
            }
            form.set_diag(j, diag);
        }
        let mut state = QStateMatrix {
            rows: rows as u8,
            cols: cols as u8,
            gens,
            form,
            factor: Factor::one(),
            reduced: false,
        };
        state.reduce();
        Ok(state)
    }

    /// Dispatches on a [`Payload`] description.
    pub fn with_payload(rows: usize, cols: usize, payload: Payload) -> QsResult<Self> {
        match payload {
            Payload::Empty => Self::zero(rows, cols),
            Payload::BasisIndex(index) => Self::basis(rows, cols, index),
            Payload::Generators { data, mode } => Self::from_generators(rows, cols, data, mode),
            Payload::CopyOf(other) => other.reshape(rows, cols),
        }
    }

    /// A signed permutation-with-offset matrix acting on column vectors.
    ///
    /// `data` has `n + 1` words of `n + 1` bits. Word `j >= 1` holds the
    /// image of basis vector `e_(j-1)` under a linear map `A` in its low
    /// `n` bits, plus a sign bit at position `n`; word 0 holds an affine
    /// offset `b` and a global sign `g`. The matrix maps
    /// `|y>` to `(-1)^(g + <s, y>) |A y XOR b>` and `A` must be invertible.
    pub fn column_monomial(data: &[u64]) -> QsResult<Self> {
        let n = data
            .len()
            .checked_sub(1)
            .ok_or(QsError::BadPayload("monomial payload is empty"))?;
        check_shape(n, n)?;
        for &word in data {
            if word >> (n + 1) != 0 {
                return Err(QsError::BadPayload("stray bits in monomial payload"));
            }
        }
        let mask = u64::low_mask(n);
        let images: Vec<u64> = data[1..].iter().map(|&word| word & mask).collect();
        if Echelon::new(&images, n).rank() != n {
            return Err(QsError::NotInvertible);
        }
        let mut gens: SmallVec<[GenRow; 16]> = SmallVec::with_capacity(n + 1);
        gens.push(GenRow::from(data[0] & mask) << n);
        let mut form = QuadForm::with_rows(n + 1);
        for (j, (&word, &image)) in data[1..].iter().zip(&images).enumerate() {
            gens.push((GenRow::from(image) << n) | (1 << j));
            if word.bit(n) {
                form.set_diag(j + 1, 2);
            }
        }
        let global_sign = if data[0].bit(n) { 4 } else { 0 };
        let mut state = QStateMatrix {
            rows: n as u8,
            cols: n as u8,
            gens,
            form,
            factor: Factor::new(0, global_sign),
            reduced: false,
        };
        state.reduce();
        Ok(state)
    }

    /// The transpose counterpart of [`QStateMatrix::column_monomial`],
    /// acting on row vectors.
    pub fn row_monomial(data: &[u64]) -> QsResult<Self> {
        let mut state = Self::column_monomial(data)?.transpose();
        state.reduce();
        Ok(state)
    }

    /// A random matrix of the given shape, built from `generator_rows`
    /// uniformly sampled generator words.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        generator_rows: usize,
        rng: &mut R,
    ) -> QsResult<Self> {
        check_shape(rows, cols)?;
        let n = rows + cols;
        if generator_rows == 0 || n + generator_rows > 64 {
            return Err(QsError::BadPayload("bad generator row count"));
        }
        let width = n + generator_rows;
        let data: Vec<u64> = (0..generator_rows)
            .map(|_| rng.gen::<u64>() & u64::low_mask(width))
            .collect();
        Self::from_generators(rows, cols, &data, TriangleMode::LowerTriangular)
    }

    /// The shape `(rows, cols)`: the matrix is `2^rows x 2^cols`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows as usize, self.cols as usize)
    }

    pub fn num_row_qubits(&self) -> usize {
        self.rows as usize
    }

    pub fn num_col_qubits(&self) -> usize {
        self.cols as usize
    }

    /// Total number of qubits, row side plus column side.
    pub fn width(&self) -> usize {
        self.rows as usize + self.cols as usize
    }

    /// The global scalar `2^(e/2) * zeta^p`. Canonical after a reduction.
    pub fn factor(&self) -> Factor {
        self.factor
    }

    pub fn is_zero(&self) -> bool {
        self.gens.is_empty()
    }

    /// Whether the representation is currently in canonical reduced form.
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    pub(crate) fn num_gens(&self) -> usize {
        self.gens.len().saturating_sub(1)
    }

    pub(crate) fn set_zero(&mut self) {
        self.gens.clear();
        self.form = QuadForm::with_rows(0);
        self.factor = Factor::one();
        self.reduced = true;
    }

    /// The entrywise complex conjugate.
    pub fn conjugate(&self) -> Self {
        let mut state = self.clone();
        for j in 0..state.form.len() {
            let diag = state.form.diag(j);
            state.form.set_diag(j, diag.wrapping_neg());
        }
        state.factor = state.factor.conj();
        state
    }

    /// The transpose: row and column qubits change roles.
    pub fn transpose(&self) -> Self {
        let mut state = self.clone();
        let n = state.width();
        let rot = state.rows as usize;
        for row in state.gens.iter_mut() {
            *row = row.rotate_window(0, n, rot);
        }
        std::mem::swap(&mut state.rows, &mut state.cols);
        state.reduced = false;
        state
    }

    /// The conjugate transpose.
    pub fn dagger(&self) -> Self {
        self.transpose().conjugate()
    }

    /// Reinterprets the qubits under a new shape with the same total width.
    pub fn reshape(&self, rows: usize, cols: usize) -> QsResult<Self> {
        check_shape(rows, cols)?;
        if rows + cols != self.width() {
            return Err(QsError::shape_mismatch(
                "reshape",
                self.shape(),
                (rows, cols),
            ));
        }
        let mut state = self.clone();
        state.rows = rows as u8;
        state.cols = cols as u8;
        Ok(state)
    }

    /// Multiplies every entry by `z`, which must be zero or of the form
    /// `2^(e/2) * zeta^p`.
    pub fn scale(&self, z: Complex64) -> QsResult<Self> {
        match Factor::from_complex(z)? {
            None => {
                let mut state = self.clone();
                state.set_zero();
                Ok(state)
            }
            Some(factor) => {
                let mut state = self.clone();
                // The zero matrix stays in its canonical form.
                if !state.is_zero() {
                    state.factor = state.factor.mul(factor);
                }
                Ok(state)
            }
        }
    }

    /// The canonical key of the represented matrix. Reduces a copy if the
    /// representation is not already reduced.
    pub fn canonical_key(&self) -> CanonicalKey {
        if self.reduced {
            return self.key_of_reduced();
        }
        let mut state = self.clone();
        state.reduce();
        state.key_of_reduced()
    }

    fn key_of_reduced(&self) -> CanonicalKey {
        debug_assert!(self.reduced);
        CanonicalKey {
            rows: self.rows,
            cols: self.cols,
            gens: self.gens.to_vec(),
            form: self.form.clone(),
            factor: self.factor,
        }
    }

    /// Starts a chain of in-place updates on this matrix.
    pub fn into_builder(self) -> StateBuilder {
        StateBuilder::new(self)
    }
}

impl PartialEq for QStateMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.canonical_key() == other.canonical_key()
    }
}

impl Eq for QStateMatrix {}
