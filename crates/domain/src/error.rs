use crate::enums::PoolId;
use thiserror::Error;

/// Every way a rebalance run can fail. Any variant aborts the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebalanceError {
    /// A value handed to the fixed-point parser is not a plain decimal literal.
    #[error("invalid number format: {0:?}")]
    InvalidNumberFormat(String),

    /// The exchange rate of a pool is zero or was never fetched.
    #[error("stale price for {pool}: exchange rate is zero or missing")]
    StalePrice { pool: PoolId },

    /// A market-data or operator-stats collaborator failed.
    #[error("upstream fetch failed ({source_name}): {message}")]
    UpstreamFetch {
        source_name: &'static str,
        message: String,
    },

    /// Normalization would divide by a zero total.
    #[error("all weights are zero: cannot normalize {0}")]
    AllWeightsZero(&'static str),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("expected {expected} values (one per pool), got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RebalanceError {
    pub fn upstream(source_name: &'static str, message: impl Into<String>) -> Self {
        Self::UpstreamFetch {
            source_name,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RebalanceError>;
