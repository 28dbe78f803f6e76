//! Per-component auction parameters.

use crate::config::AuctionConfig;
use crate::snapshot::MarketSnapshot;
use lsd_rebalance_domain::entities::auction::{
    AuctionExecutionParams, PriceCurveParams, ProposeRebalanceParams,
};
use lsd_rebalance_domain::{ByPool, FixedPoint, PoolId, Result};
use lsd_rebalance_protocols::PriceCurveEncoder;
use lsd_rebalance_protocols::addresses::component_token;
use std::sync::Arc;
use tracing::debug;

/// Derives bounded linear price curves and assembles the rebalance proposal.
pub struct AuctionParamsBuilder {
    config: AuctionConfig,
    encoder: Arc<dyn PriceCurveEncoder>,
}

impl AuctionParamsBuilder {
    pub fn new(config: AuctionConfig, encoder: Arc<dyn PriceCurveEncoder>) -> Self {
        Self { config, encoder }
    }

    /// Curve around market `price`.
    ///
    /// Selling starts below market and walks down by the sell slope; buying
    /// starts above market and walks up by the buy slope. Both stay within
    /// the max/min bounds.
    pub fn price_curve(&self, price: FixedPoint, is_decreasing: bool) -> Result<PriceCurveParams> {
        let config = &self.config;
        let (initial_price, slope) = if is_decreasing {
            (
                config.initial_price_adjust_sell_components.below(price)?,
                config.slope_for_sell_components.of(price)?,
            )
        } else {
            (
                config.initial_price_adjust_buy_components.above(price)?,
                config.slope_for_buy_components.of(price)?,
            )
        };

        Ok(PriceCurveParams {
            initial_price,
            slope,
            bucket_size: config.bucket_size,
            is_decreasing,
            max_price: config.max_price_above_market.above(price)?,
            min_price: config.min_price_below_market.below(price)?,
        })
    }

    pub async fn component_params(
        &self,
        price: FixedPoint,
        target_unit: FixedPoint,
        is_decreasing: bool,
    ) -> Result<AuctionExecutionParams> {
        let curve = self.price_curve(price, is_decreasing)?;
        let config_data = self.encoder.encode(&curve).await?;

        Ok(AuctionExecutionParams {
            target_unit,
            price_adapter_name: self.config.price_adapter_name.clone(),
            price_adapter_config_data: config_data,
        })
    }

    /// Splits pools into held and new components, both in canonical order,
    /// and builds the auction of each.
    ///
    /// A held component sells when its target is below the current holding;
    /// a new component always buys.
    pub async fn build(
        &self,
        snapshot: &MarketSnapshot,
        target_units: &ByPool<FixedPoint>,
    ) -> Result<ProposeRebalanceParams> {
        let mut old_components = Vec::new();
        let mut old_components_auction_params = Vec::new();
        let mut new_components = Vec::new();
        let mut new_components_auction_params = Vec::new();

        for pool in PoolId::ALL {
            let price = snapshot.exchange_rates[pool];
            let target_unit = target_units[pool];

            match snapshot.holdings[pool] {
                Some(current_unit) => {
                    let is_decreasing = target_unit < current_unit;
                    debug!(
                        pool = %pool,
                        current = %current_unit,
                        target = %target_unit,
                        is_decreasing,
                        "Held component"
                    );
                    old_components.push(component_token(pool));
                    old_components_auction_params
                        .push(self.component_params(price, target_unit, is_decreasing).await?);
                }
                None => {
                    debug!(pool = %pool, target = %target_unit, "New component");
                    new_components.push(component_token(pool));
                    new_components_auction_params
                        .push(self.component_params(price, target_unit, false).await?);
                }
            }
        }

        Ok(ProposeRebalanceParams {
            quote_asset: self.config.quote_asset,
            old_components,
            new_components,
            new_components_auction_params,
            old_components_auction_params,
            should_lock_set_token: self.config.should_lock_set_token,
            rebalance_duration: self.config.rebalance_duration,
            position_multiplier: snapshot.position_multiplier,
        })
    }
}
