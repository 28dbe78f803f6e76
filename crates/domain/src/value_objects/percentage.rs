use crate::error::{RebalanceError, Result};
use crate::math::fixed_point::FixedPoint;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A fraction of a price, e.g. `0.02` for 2%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(pub Decimal);

impl Percentage {
    pub fn new(fraction: Decimal) -> Self {
        Self(fraction)
    }

    pub fn from_bps(bps: u32) -> Self {
        Self(Decimal::from(bps) / Decimal::from(10000))
    }

    pub fn to_bps(&self) -> u32 {
        (self.0 * Decimal::from(10000)).to_u32().unwrap_or(0)
    }

    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// `value * fraction`
    pub fn of(&self, value: FixedPoint) -> Result<FixedPoint> {
        value.mul_fixed(FixedPoint::from_decimal(self.0)?)
    }

    /// `value * (1 + fraction)`
    pub fn above(&self, value: FixedPoint) -> Result<FixedPoint> {
        value.mul_fixed(FixedPoint::from_decimal(Decimal::ONE + self.0)?)
    }

    /// `value * (1 - fraction)`; a fraction of 100% or more is a configuration error.
    pub fn below(&self, value: FixedPoint) -> Result<FixedPoint> {
        if self.0 >= Decimal::ONE {
            return Err(RebalanceError::InvalidConfig(format!(
                "cannot move a price down by {}",
                self.0
            )));
        }
        value.mul_fixed(FixedPoint::from_decimal(Decimal::ONE - self.0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bps_conversion() {
        assert_eq!(Percentage::from_bps(200).fraction(), dec!(0.02));
        assert_eq!(Percentage::new(dec!(0.0005)).to_bps(), 5);
    }

    #[test]
    fn test_moves_price_both_ways() {
        let price = FixedPoint::from_units(2);
        let pct = Percentage::new(dec!(0.02));

        assert_eq!(pct.above(price).unwrap(), "2.04".parse().unwrap());
        assert_eq!(pct.below(price).unwrap(), "1.96".parse().unwrap());
        assert_eq!(pct.of(price).unwrap(), "0.04".parse().unwrap());
    }

    #[test]
    fn test_below_rejects_full_discount() {
        let price = FixedPoint::from_units(1);
        assert!(matches!(
            Percentage::new(dec!(1)).below(price),
            Err(RebalanceError::InvalidConfig(_))
        ));
    }
}
