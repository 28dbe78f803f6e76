//! One [`RateSource`] per staking protocol and the registry mapping pools to them.

use crate::RateSource;
use crate::addresses::{self, STETH_ETH_FEED};
use crate::contracts::{
    IChainlinkFeed, IEthxRateProvider, IOsEthPriceFeed, IRocketTokenRETH, ISfrxETH, ISwETH,
    IWstETH,
};
use crate::convert::{fixed_from_signed, fixed_from_wire};
use alloy::providers::Provider;
use alloy_primitives::Address;
use async_trait::async_trait;
use lsd_rebalance_domain::{ByPool, FixedPoint, PoolId, RebalanceError, Result};
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

fn call_failed(source_name: &'static str, method: &str, err: impl Display) -> RebalanceError {
    RebalanceError::upstream(source_name, format!("{method} failed: {err}"))
}

/// wstETH is priced in stETH, which is then priced in ETH by Chainlink.
pub struct LidoRate<P> {
    provider: P,
    wsteth: Address,
    steth_feed: Address,
}

impl<P: Provider> LidoRate<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            wsteth: addresses::rate_provider(PoolId::Lido),
            steth_feed: STETH_ETH_FEED,
        }
    }
}

#[async_trait]
impl<P: Provider> RateSource for LidoRate<P> {
    async fn fetch_rate(&self) -> Result<FixedPoint> {
        let steth_per_wsteth = IWstETH::new(self.wsteth, &self.provider)
            .stEthPerToken()
            .call()
            .await
            .map_err(|e| call_failed("lido", "stEthPerToken", e))?;
        let eth_per_steth = IChainlinkFeed::new(self.steth_feed, &self.provider)
            .latestAnswer()
            .call()
            .await
            .map_err(|e| call_failed("chainlink", "latestAnswer", e))?;

        let eth_per_steth = fixed_from_signed(eth_per_steth, "chainlink")?;
        fixed_from_wire(steth_per_wsteth).mul_fixed(eth_per_steth)
    }
}

pub struct RocketPoolRate<P> {
    provider: P,
    reth: Address,
}

impl<P: Provider> RocketPoolRate<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            reth: addresses::rate_provider(PoolId::Rocketpool),
        }
    }
}

#[async_trait]
impl<P: Provider> RateSource for RocketPoolRate<P> {
    async fn fetch_rate(&self) -> Result<FixedPoint> {
        IRocketTokenRETH::new(self.reth, &self.provider)
            .getExchangeRate()
            .call()
            .await
            .map(fixed_from_wire)
            .map_err(|e| call_failed("rocketpool", "getExchangeRate", e))
    }
}

pub struct StakeWiseRate<P> {
    provider: P,
    price_feed: Address,
}

impl<P: Provider> StakeWiseRate<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            price_feed: addresses::rate_provider(PoolId::StakeWise),
        }
    }
}

#[async_trait]
impl<P: Provider> RateSource for StakeWiseRate<P> {
    async fn fetch_rate(&self) -> Result<FixedPoint> {
        IOsEthPriceFeed::new(self.price_feed, &self.provider)
            .getRate()
            .call()
            .await
            .map(fixed_from_wire)
            .map_err(|e| call_failed("stakewise", "getRate", e))
    }
}

/// frxETH per sfrxETH; frxETH trades close to ETH so it is used as-is.
pub struct FraxRate<P> {
    provider: P,
    sfrxeth: Address,
}

impl<P: Provider> FraxRate<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            sfrxeth: addresses::rate_provider(PoolId::Frax),
        }
    }
}

#[async_trait]
impl<P: Provider> RateSource for FraxRate<P> {
    async fn fetch_rate(&self) -> Result<FixedPoint> {
        ISfrxETH::new(self.sfrxeth, &self.provider)
            .pricePerShare()
            .call()
            .await
            .map(fixed_from_wire)
            .map_err(|e| call_failed("frax", "pricePerShare", e))
    }
}

pub struct SwellRate<P> {
    provider: P,
    sweth: Address,
}

impl<P: Provider> SwellRate<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            sweth: addresses::rate_provider(PoolId::Swell),
        }
    }
}

#[async_trait]
impl<P: Provider> RateSource for SwellRate<P> {
    async fn fetch_rate(&self) -> Result<FixedPoint> {
        ISwETH::new(self.sweth, &self.provider)
            .getRate()
            .call()
            .await
            .map(fixed_from_wire)
            .map_err(|e| call_failed("swell", "getRate", e))
    }
}

pub struct StaderRate<P> {
    provider: P,
    rate_provider: Address,
}

impl<P: Provider> StaderRate<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            rate_provider: addresses::rate_provider(PoolId::Stader),
        }
    }
}

#[async_trait]
impl<P: Provider> RateSource for StaderRate<P> {
    async fn fetch_rate(&self) -> Result<FixedPoint> {
        IEthxRateProvider::new(self.rate_provider, &self.provider)
            .getExchangeRate()
            .call()
            .await
            .map(fixed_from_wire)
            .map_err(|e| call_failed("stader", "getExchangeRate", e))
    }
}

/// Rate source of every pool, looked up by [`PoolId`].
#[derive(Clone)]
pub struct RateSourceRegistry {
    sources: ByPool<Option<Arc<dyn RateSource>>>,
}

impl RateSourceRegistry {
    /// A registry with no sources; every lookup fails until one is registered.
    pub fn empty() -> Self {
        Self {
            sources: ByPool::from_fn(|_| None),
        }
    }

    /// All six mainnet sources sharing one provider.
    pub fn mainnet<P: Provider + Clone + 'static>(provider: P) -> Self {
        Self::empty()
            .with_source(PoolId::Lido, Arc::new(LidoRate::new(provider.clone())))
            .with_source(PoolId::Rocketpool, Arc::new(RocketPoolRate::new(provider.clone())))
            .with_source(PoolId::StakeWise, Arc::new(StakeWiseRate::new(provider.clone())))
            .with_source(PoolId::Frax, Arc::new(FraxRate::new(provider.clone())))
            .with_source(PoolId::Swell, Arc::new(SwellRate::new(provider.clone())))
            .with_source(PoolId::Stader, Arc::new(StaderRate::new(provider)))
    }

    pub fn with_source(mut self, pool: PoolId, source: Arc<dyn RateSource>) -> Self {
        self.sources[pool] = Some(source);
        self
    }

    /// Fetches the rate of `pool`. A missing source or a zero rate is a stale price.
    pub async fn fetch(&self, pool: PoolId) -> Result<FixedPoint> {
        let source = self.sources[pool]
            .as_ref()
            .ok_or(RebalanceError::StalePrice { pool })?;

        let rate = source.fetch_rate().await?;
        if rate.is_zero() {
            return Err(RebalanceError::StalePrice { pool });
        }
        debug!(pool = %pool, rate = %rate, "Fetched exchange rate");
        Ok(rate)
    }
}
