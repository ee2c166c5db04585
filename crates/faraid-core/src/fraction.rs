//! Fixed-share fractions
//!
//! The Quranic shares are all small rationals (1/2, 1/4, 1/8, 2/3, 1/3, 1/6).
//! Shares are kept exact while they are being chosen and only turned into a
//! percentage of the estate when they are written to the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A share of the whole estate, `numerator / denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    numerator: u32,
    denominator: u32,
}

impl Fraction {
    pub const HALF: Fraction = Fraction::new(1, 2);
    pub const QUARTER: Fraction = Fraction::new(1, 4);
    pub const EIGHTH: Fraction = Fraction::new(1, 8);
    pub const TWO_THIRDS: Fraction = Fraction::new(2, 3);
    pub const THIRD: Fraction = Fraction::new(1, 3);
    pub const SIXTH: Fraction = Fraction::new(1, 6);

    /// Build a fraction, reduced to lowest terms
    ///
    /// A zero denominator is treated as one so the value stays finite.
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        let denominator = if denominator == 0 { 1 } else { denominator };
        let divisor = gcd(numerator, denominator);
        Self {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        }
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Share of the estate as a percentage (0-100)
    pub fn percent(&self) -> f64 {
        self.numerator as f64 * 100.0 / self.denominator as f64
    }

    /// Split this fraction into `part / whole` of itself
    pub fn portion(&self, part: u64, whole: u64) -> Self {
        let numerator = self.numerator as u128 * part as u128;
        let denominator = self.denominator as u128 * whole.max(1) as u128;
        let divisor = gcd_u128(numerator, denominator);
        let (n, d) = (numerator / divisor, denominator / divisor);
        match (u32::try_from(n), u32::try_from(d)) {
            (Ok(n), Ok(d)) => Self::new(n, d),
            // Too fine to display exactly; keep the value, approximately.
            _ => Self::new((n as f64 / d as f64 * u32::MAX as f64) as u32, u32::MAX),
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

const fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    if a == 0 {
        1
    } else {
        a
    }
}

fn gcd_u128(a: u128, b: u128) -> u128 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}
