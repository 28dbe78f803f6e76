use crate::contracts::ISetToken;
use crate::convert::fixed_from_signed;
use alloy::providers::Provider;
use alloy_primitives::Address;
use lsd_rebalance_domain::{FixedPoint, RebalanceError, Result};
use tracing::debug;

const SOURCE: &str = "basket";

/// Reads component state from a SetToken-style basket contract.
#[derive(Debug, Clone)]
pub struct SetTokenReader<P> {
    provider: P,
}

impl<P: Provider> SetTokenReader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn components(&self, basket: Address) -> Result<Vec<Address>> {
        let components = ISetToken::new(basket, &self.provider)
            .getComponents()
            .call()
            .await
            .map_err(|e| RebalanceError::upstream(SOURCE, format!("getComponents failed: {e}")))?;
        debug!(basket = %basket, count = components.len(), "Fetched basket components");
        Ok(components)
    }

    /// Units of `component` per basket token. The contract stores a signed
    /// value; a negative position is rejected.
    pub async fn default_position_real_unit(
        &self,
        basket: Address,
        component: Address,
    ) -> Result<FixedPoint> {
        let unit = ISetToken::new(basket, &self.provider)
            .getDefaultPositionRealUnit(component)
            .call()
            .await
            .map_err(|e| {
                RebalanceError::upstream(
                    SOURCE,
                    format!("getDefaultPositionRealUnit({component}) failed: {e}"),
                )
            })?;
        fixed_from_signed(unit, SOURCE)
    }

    pub async fn position_multiplier(&self, basket: Address) -> Result<FixedPoint> {
        let multiplier = ISetToken::new(basket, &self.provider)
            .positionMultiplier()
            .call()
            .await
            .map_err(|e| {
                RebalanceError::upstream(SOURCE, format!("positionMultiplier failed: {e}"))
            })?;
        fixed_from_signed(multiplier, SOURCE)
    }
}
