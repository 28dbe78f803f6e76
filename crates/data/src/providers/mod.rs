//! Operator statistics providers.

mod rated;
mod static_stats;

pub use rated::{DEFAULT_RATED_API_URL, DEFAULT_WINDOW, PoolSummary, RatedProvider};
pub use static_stats::StaticOperatorStats;
