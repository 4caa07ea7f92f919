use std::fmt;
use std::str::FromStr;

use crate::common::{TupleError, DECIMAL_SCALE, MAX_DECIMAL_PRECISION};

use super::DataType;

const SCALE_FACTOR: i128 = 10i128.pow(DECIMAL_SCALE);

/// Fixed-point decimal with 12 fractional digits and up to 38 digits total,
/// held as a scaled 128-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decimal(i128);

impl Decimal {
    /// Largest magnitude (exclusive) of the scaled integer.
    const LIMIT: i128 = 10i128.pow(MAX_DECIMAL_PRECISION as u32);

    /// Creates a decimal from its scaled representation
    /// (`unscaled / 10^12` is the numeric value).
    pub fn from_unscaled(unscaled: i128) -> Self {
        Self(unscaled)
    }

    /// Returns the scaled representation.
    pub fn unscaled(&self) -> i128 {
        self.0
    }

    /// Creates a decimal holding a whole number.
    pub fn from_i64(v: i64) -> Self {
        Self(v as i128 * SCALE_FACTOR)
    }

    /// Returns true if the value fits within the maximum precision.
    pub fn in_range(&self) -> bool {
        self.0 > -Self::LIMIT && self.0 < Self::LIMIT
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let scale = SCALE_FACTOR as u128;
        if self.0 < 0 {
            write!(f, "-")?;
        }
        write!(
            f,
            "{}.{:0width$}",
            magnitude / scale,
            magnitude % scale,
            width = DECIMAL_SCALE as usize
        )
    }
}

impl FromStr for Decimal {
    type Err = TupleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TupleError::InvalidCast {
            from: format!("'{}'", s),
            to: DataType::Decimal,
        };

        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > DECIMAL_SCALE as usize
            || whole.len() + DECIMAL_SCALE as usize > MAX_DECIMAL_PRECISION
        {
            return Err(invalid());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut unscaled: i128 = 0;
        for b in whole.bytes() {
            unscaled = unscaled * 10 + (b - b'0') as i128;
        }
        for i in 0..DECIMAL_SCALE as usize {
            let digit = fraction.as_bytes().get(i).map_or(0, |b| b - b'0');
            unscaled = unscaled * 10 + digit as i128;
        }

        Ok(Self(if negative { -unscaled } else { unscaled }))
    }
}
