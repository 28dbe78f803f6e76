use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Liquid staking protocols backing the basket.
///
/// The declaration order is the canonical order of every per-pool sequence in
/// the pipeline (exchange rates, weights, target units, component addresses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PoolId {
    Lido,
    Rocketpool,
    StakeWise,
    Frax,
    Swell,
    Stader,
}

impl PoolId {
    pub const COUNT: usize = 6;

    pub const ALL: [PoolId; Self::COUNT] = [
        PoolId::Lido,
        PoolId::Rocketpool,
        PoolId::StakeWise,
        PoolId::Frax,
        PoolId::Swell,
        PoolId::Stader,
    ];

    /// Position of the pool in every per-pool sequence.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used by the operator statistics service.
    pub fn label(self) -> &'static str {
        match self {
            Self::Lido => "Lido",
            Self::Rocketpool => "Rocketpool",
            Self::StakeWise => "StakeWise",
            Self::Frax => "Frax",
            Self::Swell => "Swell",
            Self::Stader => "Stader",
        }
    }

    /// Symbol of the component token the basket holds for this pool.
    pub fn component_symbol(self) -> &'static str {
        match self {
            Self::Lido => "wstETH",
            Self::Rocketpool => "rETH",
            Self::StakeWise => "osETH",
            Self::Frax => "sfrxETH",
            Self::Swell => "swETH",
            Self::Stader => "ETHx",
        }
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PoolId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pool| pool.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown pool: {s}"))
    }
}
