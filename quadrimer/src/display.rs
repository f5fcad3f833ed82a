use std::fmt;

use bitlin::Gf2Word;
use itertools::Itertools;

use crate::scalar::Factor;
use crate::state::QStateMatrix;

/// Renders `2^(e/2) * zeta^p` with the eighth root spelled out in terms
/// of `1`, `i` and `sqrt(2)`.
fn scalar_string(factor: Factor) -> String {
    let mut log2 = factor.log2();
    let phase = factor.phase();
    let unit = match phase {
        0 => "",
        1 => "(1+i)*",
        2 => "i*",
        3 => "(-1+i)*",
        4 => "-",
        5 => "(-1-i)*",
        6 => "-i*",
        _ => "(1-i)*",
    };
    if phase & 1 == 1 {
        // zeta^(odd) carries a factor 1/sqrt(2) relative to 1 +- i
        log2 -= 1;
    }
    let magnitude = if log2 == 0 {
        String::new()
    } else if log2 % 2 == 0 {
        format!("2^{}*", log2 / 2)
    } else {
        format!("2^({log2}/2)*")
    };
    if magnitude.is_empty() && unit.is_empty() {
        "1".to_string()
    } else {
        format!("{magnitude}{unit}")
    }
}

fn bit_string(value: u128, width: usize) -> String {
    (0..width)
        .rev()
        .map(|position| if value.bit(position) { '1' } else { '0' })
        .collect()
}

impl fmt::Display for QStateMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.reduced();
        let (rows, cols) = state.shape();
        if state.is_zero() {
            return write!(f, "QState shape ({rows}, {cols}) zero");
        }
        writeln!(
            f,
            "QState shape ({rows}, {cols}) factor {}",
            scalar_string(state.factor())
        )?;
        for (index, &row) in state.gens.iter().enumerate() {
            let row_part = bit_string(row >> cols, rows);
            let col_part = bit_string(row & u128::low_mask(cols), cols);
            let support = match (rows, cols) {
                (0, 0) => "<>".to_string(),
                (_, 0) => format!("|{row_part}>"),
                (0, _) => format!("<{col_part}|"),
                _ => format!("|{row_part}><{col_part}|"),
            };
            if index == 0 {
                writeln!(f, "  offset {support}")?;
            } else {
                write!(f, "  gen    {support} d{}", state.form.diag(index))?;
                if state.form.cross_mask(index) == 0 {
                    writeln!(f)?;
                } else {
                    let coupled = state.form.cross_mask(index).set_bits().join(",");
                    writeln!(f, " c{coupled}")?;
                }
            }
        }
        Ok(())
    }
}
