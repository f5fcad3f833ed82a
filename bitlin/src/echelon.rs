use crate::word::Gf2Word;

/// A reduced row-echelon basis of GF(2) vectors with combination tracking.
///
/// Rows are inserted one at a time; each basis row remembers, as a bitmask
/// over the input rows, which combination of inputs produced it. Pivots are
/// the lowest set bit of each basis row and are kept strictly increasing,
/// with every pivot column cleared in all other basis rows.
///
/// ## Example
/// ```
/// use bitlin::Echelon;
/// let echelon = Echelon::new(&[0b011u32, 0b110, 0b101], 3);
/// assert_eq!(echelon.rank(), 2);
/// assert_eq!(echelon.solve(0b101), Some(0b011));
/// assert_eq!(echelon.solve(0b001), None);
/// ```
#[derive(Clone, Debug)]
pub struct Echelon<W: Gf2Word> {
    width: usize,
    rows: Vec<W>,
    combinations: Vec<W>,
    pivots: Vec<usize>,
}

impl<W: Gf2Word> Echelon<W> {
    /// Builds the echelon form of the given rows, each `width` bits wide.
    ///
    /// The number of rows must not exceed `W::BITS`, so that a combination
    /// fits in one word.
    pub fn new(input_rows: &[W], width: usize) -> Self {
        assert!(width <= W::BITS);
        assert!(input_rows.len() <= W::BITS);
        let mut echelon = Echelon {
            width,
            rows: Vec::with_capacity(input_rows.len()),
            combinations: Vec::with_capacity(input_rows.len()),
            pivots: Vec::with_capacity(input_rows.len()),
        };
        for (index, &row) in input_rows.iter().enumerate() {
            echelon.insert(row & W::low_mask(width), W::ONE << index);
        }
        echelon
    }

    fn insert(&mut self, mut row: W, mut combination: W) {
        for ((&basis, &extra), &pivot) in
            self.rows.iter().zip(&self.combinations).zip(&self.pivots)
        {
            if row.bit(pivot) {
                row ^= basis;
                combination ^= extra;
            }
        }
        let Some(pivot) = row.lowest_set() else {
            return;
        };
        for (basis, extra) in self.rows.iter_mut().zip(&mut self.combinations) {
            if basis.bit(pivot) {
                *basis ^= row;
                *extra ^= combination;
            }
        }
        let at = self.pivots.partition_point(|&p| p < pivot);
        self.rows.insert(at, row);
        self.combinations.insert(at, combination);
        self.pivots.insert(at, pivot);
    }

    /// The dimension of the row space.
    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The pivot column of each basis row, in increasing order.
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Expresses `target` as an XOR of input rows, returned as a bitmask
    /// over the input row indices, or `None` if `target` is outside the
    /// row space. When several combinations exist, one is returned.
    pub fn solve(&self, target: W) -> Option<W> {
        let mut residue = target & W::low_mask(self.width);
        let mut combination = W::ZERO;
        for ((&basis, &extra), &pivot) in
            self.rows.iter().zip(&self.combinations).zip(&self.pivots)
        {
            if residue.bit(pivot) {
                residue ^= basis;
                combination ^= extra;
            }
        }
        if residue == W::ZERO {
            Some(combination)
        } else {
            None
        }
    }

    /// Whether `target` lies in the row space.
    pub fn contains(&self, target: W) -> bool {
        self.solve(target).is_some()
    }
}
