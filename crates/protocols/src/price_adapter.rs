//! Encoders for the BoundedStepwiseLinearPriceAdapter configuration.
//!
//! The adapter's `getEncodedData` is a pure function that ABI-encodes its six
//! arguments. [`OnchainPriceAdapter`] asks the deployed contract to do it;
//! [`LocalPriceAdapter`] produces the same bytes without a node.

use crate::PriceCurveEncoder;
use crate::contracts::IBoundedStepwiseLinearPriceAdapter;
use crate::convert::{fixed_from_wire, fixed_to_wire};
use alloy::providers::Provider;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use lsd_rebalance_domain::entities::auction::PriceCurveParams;
use lsd_rebalance_domain::{RebalanceError, Result};

/// Name the settlement side knows the adapter by.
pub const PRICE_ADAPTER_NAME: &str = "BoundedStepwiseLinearPriceAdapter";

type EncodedCurve = (U256, U256, U256, bool, U256, U256);

fn to_tuple(params: &PriceCurveParams) -> EncodedCurve {
    (
        fixed_to_wire(params.initial_price),
        fixed_to_wire(params.slope),
        U256::from(params.bucket_size),
        params.is_decreasing,
        fixed_to_wire(params.max_price),
        fixed_to_wire(params.min_price),
    )
}

/// Calls `getEncodedData` on the deployed adapter.
pub struct OnchainPriceAdapter<P> {
    provider: P,
    address: Address,
}

impl<P: Provider> OnchainPriceAdapter<P> {
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }
}

#[async_trait]
impl<P: Provider> PriceCurveEncoder for OnchainPriceAdapter<P> {
    async fn encode(&self, params: &PriceCurveParams) -> Result<Bytes> {
        let (initial_price, slope, bucket_size, is_decreasing, max_price, min_price) =
            to_tuple(params);
        IBoundedStepwiseLinearPriceAdapter::new(self.address, &self.provider)
            .getEncodedData(
                initial_price,
                slope,
                bucket_size,
                is_decreasing,
                max_price,
                min_price,
            )
            .call()
            .await
            .map_err(|e| {
                RebalanceError::upstream("price_adapter", format!("getEncodedData failed: {e}"))
            })
    }
}

/// ABI-encodes the curve locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPriceAdapter;

#[async_trait]
impl PriceCurveEncoder for LocalPriceAdapter {
    async fn encode(&self, params: &PriceCurveParams) -> Result<Bytes> {
        Ok(to_tuple(params).abi_encode_params().into())
    }
}

/// Reverses either encoder's output.
pub fn decode_price_curve(data: &[u8]) -> Result<PriceCurveParams> {
    let invalid = |message: String| RebalanceError::upstream("price_adapter", message);

    let (initial_price, slope, bucket_size, is_decreasing, max_price, min_price) =
        EncodedCurve::abi_decode_params(data)
            .map_err(|e| invalid(format!("undecodable curve data: {e}")))?;

    Ok(PriceCurveParams {
        initial_price: fixed_from_wire(initial_price),
        slope: fixed_from_wire(slope),
        bucket_size: u64::try_from(bucket_size)
            .map_err(|_| invalid(format!("bucket size {bucket_size} out of range")))?,
        is_decreasing,
        max_price: fixed_from_wire(max_price),
        min_price: fixed_from_wire(min_price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> PriceCurveParams {
        PriceCurveParams {
            initial_price: "1.0264".parse().unwrap(),
            slope: "0.0010264".parse().unwrap(),
            bucket_size: 300,
            is_decreasing: true,
            max_price: "1.04".parse().unwrap(),
            min_price: "0.98".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_local_encoding_is_six_static_words() {
        let bytes = LocalPriceAdapter.encode(&curve()).await.unwrap();
        assert_eq!(bytes.len(), 6 * 32);

        let word = |i: usize| U256::from_be_slice(&bytes[i * 32..(i + 1) * 32]);
        assert_eq!(word(0), U256::from(1_026_400_000_000_000_000u64));
        assert_eq!(word(2), U256::from(300));
        assert_eq!(word(3), U256::from(1));
        assert_eq!(word(5), U256::from(980_000_000_000_000_000u64));
    }

    #[tokio::test]
    async fn test_decode_recovers_curve() {
        let bytes = LocalPriceAdapter.encode(&curve()).await.unwrap();
        assert_eq!(decode_price_curve(&bytes).unwrap(), curve());
    }

    #[test]
    fn test_decode_rejects_truncated_data() {
        assert!(matches!(
            decode_price_curve(&[0u8; 40]),
            Err(RebalanceError::UpstreamFetch { .. })
        ));
    }
}
