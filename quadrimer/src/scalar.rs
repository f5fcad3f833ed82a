use num_complex::Complex64;

use crate::error::QsError;
use crate::QsResult;

const RELATIVE_TOLERANCE: f64 = 1e-8;

/// A nonzero scalar of the form `2^(log2/2) * zeta^phase`, `zeta = exp(i*pi/4)`.
///
/// These are exactly the scalars that can multiply a quadratic state matrix.
/// `phase` is kept in `0..8`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Factor {
    log2: i32,
    phase: u8,
}

impl Factor {
    pub fn one() -> Self {
        Factor { log2: 0, phase: 0 }
    }

    pub(crate) fn new(log2: i32, phase: i32) -> Self {
        Factor {
            log2,
            phase: phase.rem_euclid(8) as u8,
        }
    }

    /// The exponent `e` in `2^(e/2)`.
    pub fn log2(&self) -> i32 {
        self.log2
    }

    /// The eighth-root-of-unity exponent, in `0..8`.
    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn mul(self, other: Factor) -> Factor {
        Factor::new(self.log2 + other.log2, i32::from(self.phase + other.phase))
    }

    pub fn conj(self) -> Factor {
        Factor::new(self.log2, -i32::from(self.phase))
    }

    pub(crate) fn times_pow2(self, log2: i32) -> Factor {
        Factor::new(self.log2 + log2, i32::from(self.phase))
    }

    pub(crate) fn times_zeta(self, eighth_turns: i32) -> Factor {
        Factor::new(self.log2, i32::from(self.phase) + eighth_turns)
    }

    pub fn to_complex(self) -> Complex64 {
        let magnitude = 2f64.powf(f64::from(self.log2) / 2.0);
        Complex64::from_polar(
            magnitude,
            std::f64::consts::FRAC_PI_4 * f64::from(self.phase),
        )
    }

    /// Parses a complex scalar, `None` meaning zero. Values further than a
    /// relative `1e-8` from any representable scalar are rejected.
    pub fn from_complex(value: Complex64) -> QsResult<Option<Factor>> {
        let magnitude = value.norm();
        if magnitude == 0.0 {
            return Ok(None);
        }
        let log2 = (2.0 * magnitude.log2()).round();
        if log2 > f64::from(i32::MAX) || log2 < f64::from(i32::MIN) {
            return Err(QsError::NotRepresentable);
        }
        let phase = (value.arg() / std::f64::consts::FRAC_PI_4).round();
        let factor = Factor::new(log2 as i32, phase.rem_euclid(8.0) as i32);
        let reconstructed = factor.to_complex();
        if (value - reconstructed).norm() > RELATIVE_TOLERANCE * magnitude {
            return Err(QsError::NotRepresentable);
        }
        Ok(Some(factor))
    }
}

impl Default for Factor {
    fn default() -> Self {
        Factor::one()
    }
}
