use crate::{OperatorPage, OperatorStatsProvider};
use async_trait::async_trait;
use lsd_rebalance_domain::Result;
use std::collections::HashMap;
use tracing::debug;

/// Operator statistics served from memory.
///
/// Labels without an explicit entry fall back to the defaults: a fixed
/// operator count and a single operator holding `default_validator_count`
/// validators.
#[derive(Debug, Clone)]
pub struct StaticOperatorStats {
    default_operator_count: u64,
    default_validator_count: u64,
    operator_counts: HashMap<String, u64>,
    distributions: HashMap<String, Vec<u64>>,
}

impl StaticOperatorStats {
    pub fn new(default_operator_count: u64, default_validator_count: u64) -> Self {
        Self {
            default_operator_count,
            default_validator_count,
            operator_counts: HashMap::new(),
            distributions: HashMap::new(),
        }
    }

    pub fn with_operator_count(mut self, label: impl Into<String>, count: u64) -> Self {
        self.operator_counts.insert(label.into(), count);
        self
    }

    /// Sets the per-operator validator counts reported for `label`.
    pub fn with_distribution(mut self, label: impl Into<String>, validators: Vec<u64>) -> Self {
        self.distributions.insert(label.into(), validators);
        self
    }

    fn distribution(&self, label: &str) -> Vec<u64> {
        self.distributions
            .get(label)
            .cloned()
            .unwrap_or_else(|| vec![self.default_validator_count])
    }
}

impl Default for StaticOperatorStats {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[async_trait]
impl OperatorStatsProvider for StaticOperatorStats {
    async fn operator_count(&self, label: &str, _window: &str) -> Result<u64> {
        Ok(self
            .operator_counts
            .get(label)
            .copied()
            .unwrap_or(self.default_operator_count))
    }

    async fn operator_page(
        &self,
        label: &str,
        page_size: usize,
        offset: usize,
        _window: &str,
    ) -> Result<OperatorPage> {
        let all = self.distribution(label);
        let start = offset.min(all.len());
        let end = offset.saturating_add(page_size).min(all.len());
        debug!(label, offset, page_size, "Serving static operator page");

        Ok(OperatorPage {
            validator_counts: all[start..end].to_vec(),
            has_next_page: end < all.len(),
        })
    }
}
