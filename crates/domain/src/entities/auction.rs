use crate::math::fixed_point::FixedPoint;
use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// Decoded inputs of a bounded stepwise linear price curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCurveParams {
    pub initial_price: FixedPoint,
    pub slope: FixedPoint,
    /// Seconds the price holds before stepping by `slope`.
    pub bucket_size: u64,
    /// True when the basket is selling the component and the price walks down.
    pub is_decreasing: bool,
    pub max_price: FixedPoint,
    pub min_price: FixedPoint,
}

/// Auction settings for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionExecutionParams {
    /// Target quantity of the component per basket token, 18 decimals.
    pub target_unit: FixedPoint,
    pub price_adapter_name: String,
    /// Curve configuration as returned by the price adapter, stored untouched.
    pub price_adapter_config_data: Bytes,
}

/// Everything the settlement side needs to start a rebalance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeRebalanceParams {
    pub quote_asset: Address,
    pub old_components: Vec<Address>,
    pub new_components: Vec<Address>,
    pub new_components_auction_params: Vec<AuctionExecutionParams>,
    pub old_components_auction_params: Vec<AuctionExecutionParams>,
    pub should_lock_set_token: bool,
    /// Seconds.
    pub rebalance_duration: u64,
    /// Read from the basket and passed through unchanged.
    pub position_multiplier: FixedPoint,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_field_layout_is_camel_case() {
        let params = ProposeRebalanceParams {
            quote_asset: address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            old_components: vec![],
            new_components: vec![],
            new_components_auction_params: vec![],
            old_components_auction_params: vec![AuctionExecutionParams {
                target_unit: FixedPoint::one(),
                price_adapter_name: "BoundedStepwiseLinearPriceAdapter".to_string(),
                price_adapter_config_data: Bytes::from_static(&[0xab]),
            }],
            should_lock_set_token: false,
            rebalance_duration: 86400,
            position_multiplier: FixedPoint::one(),
        };

        let json = serde_json::to_value(&params).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        for key in [
            "quoteAsset",
            "oldComponents",
            "newComponents",
            "newComponentsAuctionParams",
            "oldComponentsAuctionParams",
            "shouldLockSetToken",
            "rebalanceDuration",
            "positionMultiplier",
        ] {
            assert!(keys.contains(&key.to_string()), "missing {key}");
        }
        assert_eq!(keys.len(), 8);

        let auction = &json["oldComponentsAuctionParams"][0];
        assert_eq!(auction["targetUnit"], "1000000000000000000");
        assert_eq!(auction["priceAdapterConfigData"], "0xab");
    }
}
