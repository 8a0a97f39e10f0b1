//! Non-negative arbitrary-precision decimal numbers.
//!
//! A value is stored as an unbounded integer mantissa plus a base-10 scale, so
//! `1.5` is `15 × 10^-1`. Every operation here is exact except
//! [`Decimal::round_half_up`], which is the only place precision is dropped.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a non-negative decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal amount: {0:?}")]
pub struct ParseDecimalError(pub String);

/// A non-negative decimal of unbounded size and precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    digits: BigUint,
    scale: u32,
}

/// Largest `e`/`E` exponent magnitude accepted when parsing.
pub const MAX_EXPONENT: i64 = 1024;

fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}

impl Decimal {
    pub fn zero() -> Self {
        Self {
            digits: BigUint::zero(),
            scale: 0,
        }
    }

    /// Build a decimal from a whole number.
    pub fn from_integer(value: BigUint) -> Self {
        Self {
            digits: value,
            scale: 0,
        }
    }

    /// Number of fractional digits currently carried.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_zero()
    }

    /// Exact multiplication by `10^exp`.
    pub fn mul_pow10(&self, exp: u32) -> Self {
        if self.scale >= exp {
            Self {
                digits: self.digits.clone(),
                scale: self.scale - exp,
            }
        } else {
            Self {
                digits: &self.digits * pow10(exp - self.scale),
                scale: 0,
            }
        }
    }

    /// Exact division by `10^exp`.
    pub fn div_pow10(&self, exp: u32) -> Self {
        Self {
            digits: self.digits.clone(),
            scale: self.scale.saturating_add(exp),
        }
    }

    /// Exact product of two decimals.
    pub fn mul(&self, other: &Decimal) -> Self {
        Self {
            digits: &self.digits * &other.digits,
            scale: self.scale + other.scale,
        }
        .trim()
    }

    /// Round to at most `precision` fractional digits, ties away from zero.
    pub fn round_half_up(&self, precision: u32) -> Self {
        if self.scale <= precision {
            return self.clone();
        }
        let divisor = pow10(self.scale - precision);
        let mut quotient = &self.digits / &divisor;
        let remainder = &self.digits % &divisor;
        if remainder * 2u32 >= divisor {
            quotient += 1u32;
        }
        Self {
            digits: quotient,
            scale: precision,
        }
    }

    /// Smallest whole number greater than or equal to this value.
    pub fn ceil(&self) -> BigUint {
        if self.scale == 0 {
            return self.digits.clone();
        }
        let divisor = pow10(self.scale);
        let quotient = &self.digits / &divisor;
        if (&self.digits % &divisor).is_zero() {
            quotient
        } else {
            quotient + BigUint::one()
        }
    }

    /// Drop trailing fractional zeros without changing the value.
    pub fn trim(&self) -> Self {
        let ten = BigUint::from(10u32);
        let mut digits = self.digits.clone();
        let mut scale = self.scale;
        while scale > 0 && !digits.is_zero() && (&digits % &ten).is_zero() {
            digits /= &ten;
            scale -= 1;
        }
        if digits.is_zero() {
            scale = 0;
        }
        Self { digits, scale }
    }

    /// The whole-number value, if there is no fractional part.
    pub fn to_integer(&self) -> Option<BigUint> {
        let trimmed = self.trim();
        (trimmed.scale == 0).then_some(trimmed.digits)
    }

    /// Render with exactly `precision` fractional digits, rounding half-up.
    pub fn to_fixed(&self, precision: u32) -> String {
        let rounded = self.round_half_up(precision);
        let padded = Self {
            digits: &rounded.digits * pow10(precision - rounded.scale),
            scale: precision,
        };
        padded.render()
    }

    fn render(&self) -> String {
        let raw = self.digits.to_string();
        if self.scale == 0 {
            return raw;
        }
        let scale = self.scale as usize;
        let raw = if raw.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - raw.len()), raw)
        } else {
            raw
        };
        let (int_part, frac_part) = raw.split_at(raw.len() - scale);
        format!("{int_part}.{frac_part}")
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self::from_integer(BigUint::from(value))
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Accepts `123`, `1.5`, `.5`, `5.` and an optional `e`/`E` exponent of at
    /// most [`MAX_EXPONENT`] in magnitude.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDecimalError(s.to_string());
        let trimmed = s.trim();
        let (mantissa, exponent) = match trimmed.find(|c| c == 'e' || c == 'E') {
            Some(idx) => {
                let exp: i64 = trimmed[idx + 1..].parse().map_err(|_| err())?;
                if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&exp) {
                    return Err(err());
                }
                (&trimmed[..idx], exp)
            }
            None => (trimmed, 0),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let joined = format!("{int_part}{frac_part}");
        let digits = BigUint::parse_bytes(joined.as_bytes(), 10).ok_or_else(err)?;
        let scale = i64::try_from(frac_part.len()).map_err(|_| err())? - exponent;

        let value = if scale >= 0 {
            Self {
                digits,
                scale: u32::try_from(scale).map_err(|_| err())?,
            }
        } else {
            let shift = u32::try_from(-scale).map_err(|_| err())?;
            Self {
                digits: digits * pow10(shift),
                scale: 0,
            }
        };
        Ok(value)
    }
}

impl fmt::Display for Decimal {
    /// Shortest exact representation (no trailing fractional zeros).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trim().render())
    }
}
