//! Mainnet deployment addresses.

use alloy_primitives::{Address, address};
use lsd_rebalance_domain::PoolId;

/// Wrapped ether, the quote asset of every auction.
pub const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// dsETH basket token.
pub const DSETH: Address = address!("0x341c05c0E9b33C0E38d64de76516b2Ce970bB3BE");

/// BoundedStepwiseLinearPriceAdapter.
pub const PRICE_ADAPTER: Address = address!("0x237F7BBe0b358415bE84AB6d279D4338C0d026bB");

pub const WSTETH: Address = address!("0x7f39C581F595B53c5cb19bD0b3f8dA6c935E2Ca0");
pub const RETH: Address = address!("0xae78736Cd615f374D3085123A210448E74Fc6393");
pub const OSETH: Address = address!("0xf1C9acDc66974dFB6dEcB12aA385b9cD01190E38");
pub const SFRXETH: Address = address!("0xac3E018457B222d93114458476f3E3416Abbe38F");
pub const SWETH: Address = address!("0xf951E335afb289353dc249e82926178EaC7DEd78");
pub const ETHX: Address = address!("0xA35b1B31Ce002FBF2058D22F30f95D405200A15b");

/// Chainlink stETH/ETH feed.
pub const STETH_ETH_FEED: Address = address!("0x86392dC19c0b719886221c78AB11eb8Cf5c52812");
/// StakeWise osETH price feed.
pub const OSETH_PRICE_FEED: Address = address!("0x8023518b2192FB5384DAdc596765B3dD1cdFe471");
/// Stader ETHx rate provider.
pub const ETHX_RATE_PROVIDER: Address = address!("0xcf5EA1b38380f6aF39068375516Daf40Ed70D299");

/// Component token the basket holds for `pool`.
pub fn component_token(pool: PoolId) -> Address {
    match pool {
        PoolId::Lido => WSTETH,
        PoolId::Rocketpool => RETH,
        PoolId::StakeWise => OSETH,
        PoolId::Frax => SFRXETH,
        PoolId::Swell => SWETH,
        PoolId::Stader => ETHX,
    }
}

/// Contract queried for the exchange rate of `pool`.
///
/// Lido also needs [`STETH_ETH_FEED`] on top of this one.
pub fn rate_provider(pool: PoolId) -> Address {
    match pool {
        PoolId::StakeWise => OSETH_PRICE_FEED,
        PoolId::Stader => ETHX_RATE_PROVIDER,
        other => component_token(other),
    }
}

/// Reverse lookup of [`component_token`].
pub fn pool_for_component(token: Address) -> Option<PoolId> {
    PoolId::ALL
        .into_iter()
        .find(|pool| component_token(*pool) == token)
}
