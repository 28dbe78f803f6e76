//! Market state read once per run.

use alloy_primitives::Address;
use lsd_rebalance_domain::metrics::target_units::nav;
use lsd_rebalance_domain::{ByPool, FixedPoint, PoolId, RebalanceError, Result};
use lsd_rebalance_protocols::MarketDataGateway;
use lsd_rebalance_protocols::addresses::{component_token, pool_for_component};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Rates and basket state every later stage of a run reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSnapshot {
    pub basket: Address,
    pub exchange_rates: ByPool<FixedPoint>,
    /// Components as the basket reports them.
    pub held_components: Vec<Address>,
    /// Units per basket token; `None` when the pool's component is not held.
    pub holdings: ByPool<Option<FixedPoint>>,
    pub position_multiplier: FixedPoint,
}

impl MarketSnapshot {
    /// Reads rates, components, holdings and position multiplier of `basket`.
    ///
    /// # Errors
    /// Fails on the first collaborator error, on a zero or missing exchange
    /// rate, and when the basket holds a token that maps to no pool.
    pub async fn fetch(market: Arc<dyn MarketDataGateway>, basket: Address) -> Result<Self> {
        let exchange_rates = fetch_exchange_rates(&market).await?;

        let held_components = market.components(basket).await?;
        if let Some(unknown) = held_components
            .iter()
            .find(|token| pool_for_component(**token).is_none())
        {
            return Err(RebalanceError::InvalidConfig(format!(
                "basket {basket} holds {unknown}, which belongs to no known pool"
            )));
        }

        let mut holdings = ByPool::from_fn(|_| None);
        for pool in PoolId::ALL {
            let token = component_token(pool);
            if held_components.contains(&token) {
                let units = market.holding_amount(basket, token).await?;
                debug!(pool = %pool, units = %units, "Fetched holding");
                holdings[pool] = Some(units);
            }
        }

        let position_multiplier = market.position_multiplier(basket).await?;
        info!(
            basket = %basket,
            components = held_components.len(),
            position_multiplier = %position_multiplier,
            "Market snapshot taken"
        );

        Ok(Self {
            basket,
            exchange_rates,
            held_components,
            holdings,
            position_multiplier,
        })
    }

    /// Value of one basket token in quote units.
    pub fn nav(&self) -> Result<FixedPoint> {
        nav(&self.holdings, &self.exchange_rates)
    }

    pub fn is_held(&self, pool: PoolId) -> bool {
        self.holdings[pool].is_some()
    }
}

/// Fetches all rates concurrently; each result lands in its pool's slot.
async fn fetch_exchange_rates(market: &Arc<dyn MarketDataGateway>) -> Result<ByPool<FixedPoint>> {
    let mut tasks = JoinSet::new();
    for pool in PoolId::ALL {
        let market = Arc::clone(market);
        tasks.spawn(async move { (pool, market.exchange_rate(pool).await) });
    }

    let mut rates: ByPool<Option<FixedPoint>> = ByPool::from_fn(|_| None);
    while let Some(joined) = tasks.join_next().await {
        let (pool, rate) = joined
            .map_err(|e| RebalanceError::upstream("market_data", format!("rate task failed: {e}")))?;
        rates[pool] = Some(rate?);
    }

    ByPool::try_from_fn(|pool| match rates[pool] {
        Some(rate) if !rate.is_zero() => Ok(rate),
        _ => Err(RebalanceError::StalePrice { pool }),
    })
}
