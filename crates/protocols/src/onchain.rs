use crate::MarketDataGateway;
use crate::basket::SetTokenReader;
use crate::rate_sources::RateSourceRegistry;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::http::reqwest::Url;
use alloy_primitives::Address;
use async_trait::async_trait;
use lsd_rebalance_domain::{FixedPoint, PoolId, RebalanceError, Result};
use tracing::info;

/// Opens an HTTP JSON-RPC provider.
///
/// # Errors
/// Returns [`RebalanceError::InvalidConfig`] if `rpc_url` is not a URL.
pub fn connect_http(rpc_url: &str) -> Result<DynProvider> {
    let url: Url = rpc_url
        .parse()
        .map_err(|e| RebalanceError::InvalidConfig(format!("RPC URL {rpc_url:?}: {e}")))?;
    info!("Connecting to JSON-RPC endpoint");
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// [`MarketDataGateway`] backed by a live node.
#[derive(Clone)]
pub struct OnchainMarketData<P> {
    rates: RateSourceRegistry,
    basket: SetTokenReader<P>,
}

impl<P: Provider + Clone + 'static> OnchainMarketData<P> {
    /// Mainnet rate sources and basket reader over one provider.
    pub fn mainnet(provider: P) -> Self {
        Self {
            rates: RateSourceRegistry::mainnet(provider.clone()),
            basket: SetTokenReader::new(provider),
        }
    }
}

#[async_trait]
impl<P: Provider + Clone + 'static> MarketDataGateway for OnchainMarketData<P> {
    async fn exchange_rate(&self, pool: PoolId) -> Result<FixedPoint> {
        self.rates.fetch(pool).await
    }

    async fn components(&self, basket: Address) -> Result<Vec<Address>> {
        self.basket.components(basket).await
    }

    async fn holding_amount(&self, basket: Address, asset: Address) -> Result<FixedPoint> {
        self.basket.default_position_real_unit(basket, asset).await
    }

    async fn position_multiplier(&self, basket: Address) -> Result<FixedPoint> {
        self.basket.position_multiplier(basket).await
    }
}
