//! On-chain collaborators of the rebalancer.
//!
//! This crate reads Ethereum mainnet through alloy:
//! - Exchange rates of every LSD component, one source per protocol
//! - Components, holdings and position multiplier of the basket token
//! - Price-curve configuration bytes for the auction adapter

/// Mainnet address table.
pub mod addresses;
/// SetToken reader.
pub mod basket;
/// Solidity interfaces.
pub mod contracts;
/// Integer conversions between alloy and the domain.
pub mod convert;
/// Market data gateway over a live node.
pub mod onchain;
/// Price-curve encoders.
pub mod price_adapter;
/// Per-protocol exchange rate sources.
pub mod rate_sources;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use lsd_rebalance_domain::entities::auction::PriceCurveParams;
use lsd_rebalance_domain::{FixedPoint, PoolId, Result};

/// Exchange rate of one LSD component into ETH, 18 decimals.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(&self) -> Result<FixedPoint>;
}

/// Market state the pipeline consumes.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Quote units per unit of the pool's component.
    async fn exchange_rate(&self, pool: PoolId) -> Result<FixedPoint>;

    /// Components the basket currently holds, in the basket's own order.
    async fn components(&self, basket: Address) -> Result<Vec<Address>>;

    /// Units of `asset` per basket token.
    async fn holding_amount(&self, basket: Address, asset: Address) -> Result<FixedPoint>;

    async fn position_multiplier(&self, basket: Address) -> Result<FixedPoint>;
}

/// Turns decoded curve inputs into the adapter's opaque configuration bytes.
#[async_trait]
pub trait PriceCurveEncoder: Send + Sync {
    async fn encode(&self, params: &PriceCurveParams) -> Result<Bytes>;
}
