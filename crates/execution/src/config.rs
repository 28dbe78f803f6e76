//! Auction and operator-statistics configuration.

use alloy_primitives::Address;
use lsd_rebalance_data::providers::{DEFAULT_RATED_API_URL, DEFAULT_WINDOW};
use lsd_rebalance_domain::{Percentage, RebalanceError, Result};
use lsd_rebalance_protocols::addresses::{PRICE_ADAPTER, WETH};
use lsd_rebalance_protocols::price_adapter::PRICE_ADAPTER_NAME;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zeroize::Zeroizing;

/// Parameters shared by every component auction of a rebalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuctionConfig {
    /// Price adapter identifier stored in each component's auction params.
    pub price_adapter_name: String,
    /// Deployed adapter used to encode curve configuration.
    pub price_adapter_address: Address,
    /// Asset every component is auctioned against.
    pub quote_asset: Address,
    /// Seconds between price steps.
    pub bucket_size: u64,
    /// Price step per bucket when selling, as a fraction of market price.
    pub slope_for_sell_components: Percentage,
    /// Price step per bucket when buying, as a fraction of market price.
    pub slope_for_buy_components: Percentage,
    /// Starting discount to market when selling.
    pub initial_price_adjust_sell_components: Percentage,
    /// Starting premium over market when buying.
    pub initial_price_adjust_buy_components: Percentage,
    /// Upper bound above market price.
    pub max_price_above_market: Percentage,
    /// Lower bound below market price.
    pub min_price_below_market: Percentage,
    /// Whether the basket is locked while the auction runs.
    pub should_lock_set_token: bool,
    /// Auction length in seconds.
    pub rebalance_duration: u64,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            price_adapter_name: PRICE_ADAPTER_NAME.to_string(),
            price_adapter_address: PRICE_ADAPTER,
            quote_asset: WETH,
            bucket_size: 300, // 5 minutes
            slope_for_sell_components: Percentage::new(Decimal::new(1, 3)), // 0.1%
            slope_for_buy_components: Percentage::new(Decimal::new(5, 4)), // 0.05%
            initial_price_adjust_sell_components: Percentage::from_bps(100),
            initial_price_adjust_buy_components: Percentage::from_bps(100),
            max_price_above_market: Percentage::from_bps(200),
            min_price_below_market: Percentage::from_bps(200),
            should_lock_set_token: false,
            rebalance_duration: 60 * 60 * 24, // 24 hours
        }
    }
}

impl AuctionConfig {
    /// Reads a JSON file; fields it leaves out keep their defaults.
    ///
    /// # Errors
    /// Returns [`RebalanceError::InvalidConfig`] if the file cannot be read,
    /// is not valid JSON, or fails [`AuctionConfig::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RebalanceError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            RebalanceError::InvalidConfig(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every percentage is a fraction in `[0, 1)` and each starting
    /// price sits strictly inside its bound.
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("slopeForSellComponents", self.slope_for_sell_components),
            ("slopeForBuyComponents", self.slope_for_buy_components),
            ("initialPriceAdjustSellComponents", self.initial_price_adjust_sell_components),
            ("initialPriceAdjustBuyComponents", self.initial_price_adjust_buy_components),
            ("maxPriceAboveMarket", self.max_price_above_market),
            ("minPriceBelowMarket", self.min_price_below_market),
        ];
        for (name, pct) in fractions {
            if pct.fraction().is_sign_negative() || pct.fraction() >= Decimal::ONE {
                return Err(RebalanceError::InvalidConfig(format!(
                    "{name} must be a fraction in [0, 1), got {}",
                    pct.fraction()
                )));
            }
        }
        if self.initial_price_adjust_sell_components.fraction()
            >= self.min_price_below_market.fraction()
        {
            return Err(RebalanceError::InvalidConfig(
                "initialPriceAdjustSellComponents must be below minPriceBelowMarket".to_string(),
            ));
        }
        if self.initial_price_adjust_buy_components.fraction()
            >= self.max_price_above_market.fraction()
        {
            return Err(RebalanceError::InvalidConfig(
                "initialPriceAdjustBuyComponents must be below maxPriceAboveMarket".to_string(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RebalanceError::InvalidConfig(
                "bucketSize must be positive".to_string(),
            ));
        }
        if self.price_adapter_name.is_empty() {
            return Err(RebalanceError::InvalidConfig(
                "priceAdapterName is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Connection settings of the operator statistics service.
#[derive(Clone)]
pub struct RatedConfig {
    pub base_url: String,
    pub access_token: Zeroizing<String>,
    /// Aggregation window, e.g. `1d`.
    pub window: String,
    /// Operators requested per page.
    pub page_size: usize,
}

impl RatedConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_RATED_API_URL.to_string(),
            access_token: Zeroizing::new(access_token.into()),
            window: DEFAULT_WINDOW.to_string(),
            page_size: 1000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Window and page size of operator queries; a zero page size becomes 1.
    pub fn with_query(mut self, window: impl Into<String>, page_size: usize) -> Self {
        self.window = window.into();
        self.page_size = page_size.max(1);
        self
    }
}

impl std::fmt::Debug for RatedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatedConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("window", &self.window)
            .field("page_size", &self.page_size)
            .finish()
    }
}
