//! Conversions between contract integers and [`FixedPoint`].

use alloy_primitives::{I256, U256};
use lsd_rebalance_domain::{FixedPoint, RebalanceError, Result};

/// Both representations store four little-endian 64-bit limbs.
pub fn fixed_from_wire(value: U256) -> FixedPoint {
    FixedPoint::from_raw(primitive_types::U256(value.into_limbs()))
}

pub fn fixed_to_wire(value: FixedPoint) -> U256 {
    U256::from_limbs(value.raw().0)
}

/// Reads a signed contract value that must never be negative.
pub fn fixed_from_signed(value: I256, source_name: &'static str) -> Result<FixedPoint> {
    if value.is_negative() {
        return Err(RebalanceError::upstream(
            source_name,
            format!("unexpected negative value {value}"),
        ));
    }
    Ok(fixed_from_wire(value.into_raw()))
}
