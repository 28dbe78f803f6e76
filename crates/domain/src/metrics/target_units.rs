use crate::enums::PoolId;
use crate::error::{RebalanceError, Result};
use crate::math::fixed_point::FixedPoint;
use crate::value_objects::by_pool::ByPool;

/// Net asset value of the basket in quote units.
///
/// Sums `units * rate / 1e18` over every pool; pools whose component the
/// basket does not hold (`None`) contribute nothing.
pub fn nav(
    holdings: &ByPool<Option<FixedPoint>>,
    exchange_rates: &ByPool<FixedPoint>,
) -> Result<FixedPoint> {
    holdings
        .iter()
        .filter_map(|(pool, units)| units.map(|units| (pool, units)))
        .try_fold(FixedPoint::ZERO, |acc, (pool, units)| {
            acc.checked_add(units.mul_fixed(exchange_rates[pool])?)
        })
}

/// Target holding per component: `nav * weight / rate`.
///
/// Weights are converted to fixed point (truncated to 18 decimals) before
/// the multiplication. A zero rate means the price feed is unusable.
pub fn target_units(
    weights: &ByPool<f64>,
    nav: FixedPoint,
    exchange_rates: &ByPool<FixedPoint>,
) -> Result<ByPool<FixedPoint>> {
    ByPool::try_from_fn(|pool: PoolId| {
        let rate = exchange_rates[pool];
        if rate.is_zero() {
            return Err(RebalanceError::StalePrice { pool });
        }
        let weight = FixedPoint::from_f64(weights[pool])?;
        nav.mul_div(weight, rate)
    })
}
