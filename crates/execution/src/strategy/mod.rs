//! Auction derivation and the rebalance pipeline.

mod auction;
mod proposer;

pub use auction::AuctionParamsBuilder;
pub use proposer::{RebalanceProposal, RebalanceProposer, WeightBreakdown};
