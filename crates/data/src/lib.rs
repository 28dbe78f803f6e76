//! Operator statistics collaborators.
//!
//! This crate provides the node-operator data the weighting engine consumes:
//! - Operator counts per pool label
//! - Paginated validator counts per operator
//! - A REST client for the statistics service and a static provider for
//!   offline runs and tests

/// Provider implementations.
pub mod providers;

use async_trait::async_trait;
use lsd_rebalance_domain::Result;
use serde::{Deserialize, Serialize};

/// One page of per-operator validator counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorPage {
    /// Validator count of each operator on this page, in service order.
    pub validator_counts: Vec<u64>,
    /// Whether another page follows at `offset + page_size`.
    pub has_next_page: bool,
}

/// Source of node operator statistics for a pool label.
///
/// Labels are the service's own names ("Rocketpool", "Lido Curated Module",
/// ...). Composite pools are split into labels by the caller.
#[async_trait]
pub trait OperatorStatsProvider: Send + Sync {
    /// Number of distinct node operators behind `label` over `window`.
    async fn operator_count(&self, label: &str, window: &str) -> Result<u64>;

    /// Validator counts of operators `offset..offset + page_size`.
    async fn operator_page(
        &self,
        label: &str,
        page_size: usize,
        offset: usize,
        window: &str,
    ) -> Result<OperatorPage>;
}
