//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use lsd_rebalance_execution::prelude::*;
//! ```

pub use crate::composition::{OperatorSource, PoolComposition};
pub use crate::config::{AuctionConfig, RatedConfig};
pub use crate::snapshot::MarketSnapshot;
pub use crate::strategy::{
    AuctionParamsBuilder, RebalanceProposal, RebalanceProposer, WeightBreakdown,
};
