pub mod auction;

pub use auction::{AuctionExecutionParams, PriceCurveParams, ProposeRebalanceParams};
