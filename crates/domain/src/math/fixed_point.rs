//! 18-decimal fixed-point arithmetic over U256.
//!
//! Convention used everywhere in the pipeline: the product of two fixed-point
//! values is divided by 10^18; a quotient multiplies the numerator by 10^18
//! first. When a product is immediately divided by a third fixed-point value
//! the scales cancel and the whole expression is one [`FixedPoint::mul_div`],
//! truncating once.

use crate::error::{RebalanceError, Result};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fractional digits carried by [`FixedPoint`].
pub const DECIMALS: usize = 18;

// 10^77 is the largest power of ten that fits in a U256.
const MAX_FRACTION_DIGITS: usize = 77;

/// Parses a decimal literal into an integer scaled by `10^fraction_digits`.
///
/// Fractional digits beyond `fraction_digits` are truncated, never rounded.
/// Signs, exponents, whitespace and anything else that is not
/// `digits[.digits]` fail with [`RebalanceError::InvalidNumberFormat`].
pub fn to_fixed(value: &str, fraction_digits: usize) -> Result<U256> {
    let invalid = || RebalanceError::InvalidNumberFormat(value.to_string());

    if fraction_digits > MAX_FRACTION_DIGITS {
        return Err(invalid());
    }

    let (integer_part, fractional_part) = value.split_once('.').unwrap_or((value, ""));
    if integer_part.is_empty() && fractional_part.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer_part) || !all_digits(fractional_part) {
        return Err(invalid());
    }

    let kept = &fractional_part[..fractional_part.len().min(fraction_digits)];

    let integer = if integer_part.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(integer_part).map_err(|_| invalid())?
    };
    let fraction = if kept.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(kept).map_err(|_| invalid())? * U256::exp10(fraction_digits - kept.len())
    };

    integer
        .checked_mul(U256::exp10(fraction_digits))
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or_else(invalid)
}

fn scale() -> U256 {
    U256::exp10(DECIMALS)
}

/// Non-negative quantity with 18 implied decimals (wei-style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedPoint(U256);

impl FixedPoint {
    pub const ZERO: Self = Self(U256([0; 4]));

    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Builds a value from whole units, e.g. `from_units(2)` is 2.0.
    pub fn from_units(units: u64) -> Self {
        Self(U256::from(units) * scale())
    }

    pub fn one() -> Self {
        Self(scale())
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Converts a float through its shortest round-trip decimal form.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value.is_sign_negative() {
            return Err(RebalanceError::InvalidNumberFormat(value.to_string()));
        }
        to_fixed(&value.to_string(), DECIMALS).map(Self)
    }

    pub fn from_decimal(value: Decimal) -> Result<Self> {
        to_fixed(&value.normalize().to_string(), DECIMALS).map(Self)
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(RebalanceError::Overflow("fixed-point addition"))
    }

    /// `self * rhs`, keeping the 18-decimal scale.
    pub fn mul_fixed(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_mul(rhs.0)
            .map(|product| Self(product / scale()))
            .ok_or(RebalanceError::Overflow("fixed-point multiplication"))
    }

    /// `self / rhs`, keeping the 18-decimal scale.
    pub fn div_fixed(self, rhs: Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(RebalanceError::Overflow("fixed-point division by zero"));
        }
        self.0
            .checked_mul(scale())
            .map(|numerator| Self(numerator / rhs.0))
            .ok_or(RebalanceError::Overflow("fixed-point division"))
    }

    /// `self * mul / div` with a single truncation.
    pub fn mul_div(self, mul: Self, div: Self) -> Result<Self> {
        if div.is_zero() {
            return Err(RebalanceError::Overflow("fixed-point division by zero"));
        }
        self.0
            .checked_mul(mul.0)
            .map(|product| Self(product / div.0))
            .ok_or(RebalanceError::Overflow("fixed-point mul_div"))
    }
}

impl FromStr for FixedPoint {
    type Err = RebalanceError;

    fn from_str(s: &str) -> Result<Self> {
        to_fixed(s, DECIMALS).map(Self)
    }
}

impl From<U256> for FixedPoint {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl From<u128> for FixedPoint {
    fn from(raw: u128) -> Self {
        Self(U256::from(raw))
    }
}

/// Ether-style rendering: trailing zeros trimmed, at least one fractional digit.
impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / scale();
        let fraction = format!("{:0>width$}", (self.0 % scale()).to_string(), width = DECIMALS);
        let trimmed = fraction.trim_end_matches('0');
        let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
        write!(f, "{whole}.{trimmed}")
    }
}

// The raw scaled integer travels as a decimal string.
impl Serialize for FixedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FixedPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        U256::from_dec_str(&raw)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}
