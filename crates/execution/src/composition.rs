//! How each pool maps onto labels of the operator statistics service.

use lsd_rebalance_data::OperatorStatsProvider;
use lsd_rebalance_domain::{ByPool, PoolId, Result};
use tracing::debug;

/// Where a pool's operator data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorSource {
    /// One or more service labels; counts are summed and distributions
    /// concatenated in label order.
    Labels(Vec<&'static str>),
    /// All validators sit under one operator the service does not report.
    SingleOperator,
}

/// Composition rule of every pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolComposition {
    sources: ByPool<OperatorSource>,
}

impl Default for PoolComposition {
    fn default() -> Self {
        Self {
            sources: ByPool::from_fn(|pool| match pool {
                PoolId::Lido => {
                    OperatorSource::Labels(vec!["Lido Curated Module", "Lido SimpleDVT Module"])
                }
                PoolId::Stader => {
                    OperatorSource::Labels(vec!["Stader Permissioned", "Stader Permissionless"])
                }
                PoolId::Frax => OperatorSource::SingleOperator,
                other => OperatorSource::Labels(vec![other.label()]),
            }),
        }
    }
}

impl PoolComposition {
    pub fn source(&self, pool: PoolId) -> &OperatorSource {
        &self.sources[pool]
    }

    pub fn with_source(mut self, pool: PoolId, source: OperatorSource) -> Self {
        self.sources[pool] = source;
        self
    }

    /// Operator count of `pool` under its composition rule.
    pub async fn operator_count(
        &self,
        stats: &dyn OperatorStatsProvider,
        pool: PoolId,
        window: &str,
    ) -> Result<u64> {
        match self.source(pool) {
            OperatorSource::SingleOperator => Ok(1),
            OperatorSource::Labels(labels) => {
                let mut total = 0u64;
                for label in labels {
                    total = total.saturating_add(stats.operator_count(label, window).await?);
                }
                Ok(total)
            }
        }
    }

    /// Validator count of every operator of `pool`, paging through each label.
    pub async fn validator_distribution(
        &self,
        stats: &dyn OperatorStatsProvider,
        pool: PoolId,
        page_size: usize,
        window: &str,
    ) -> Result<Vec<u64>> {
        match self.source(pool) {
            OperatorSource::SingleOperator => Ok(vec![1]),
            OperatorSource::Labels(labels) => {
                let mut distribution = Vec::new();
                for label in labels {
                    distribution.extend(label_distribution(stats, label, page_size, window).await?);
                }
                Ok(distribution)
            }
        }
    }
}

async fn label_distribution(
    stats: &dyn OperatorStatsProvider,
    label: &str,
    page_size: usize,
    window: &str,
) -> Result<Vec<u64>> {
    let mut validators = Vec::new();
    let mut offset = 0;
    loop {
        let page = stats.operator_page(label, page_size, offset, window).await?;
        // an empty page ends the walk even if the service claims more
        let received = page.validator_counts.len();
        validators.extend(page.validator_counts);
        if !page.has_next_page || received == 0 {
            break;
        }
        offset += page_size;
    }
    debug!(label, operators = validators.len(), "Collected validator distribution");
    Ok(validators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lsd_rebalance_data::OperatorPage;
    use lsd_rebalance_data::providers::StaticOperatorStats;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves one full page, then empty pages that still claim a successor.
    #[derive(Default)]
    struct EndlessPages {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OperatorStatsProvider for EndlessPages {
        async fn operator_count(&self, _label: &str, _window: &str) -> Result<u64> {
            Ok(2)
        }

        async fn operator_page(
            &self,
            _label: &str,
            _page_size: usize,
            offset: usize,
            _window: &str,
        ) -> Result<OperatorPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let validator_counts = if offset == 0 { vec![40, 60] } else { Vec::new() };
            Ok(OperatorPage {
                validator_counts,
                has_next_page: true,
            })
        }
    }

    fn stats() -> StaticOperatorStats {
        StaticOperatorStats::new(3, 1)
            .with_operator_count("Lido Curated Module", 37)
            .with_operator_count("Lido SimpleDVT Module", 200)
            .with_operator_count("Stader Permissioned", 10)
            .with_operator_count("Stader Permissionless", 4)
            .with_distribution("Lido Curated Module", vec![100, 200])
            .with_distribution("Lido SimpleDVT Module", vec![7])
            .with_distribution("Rocketpool", (1..=2500).collect())
    }

    #[tokio::test]
    async fn test_composite_counts_are_summed() {
        let composition = PoolComposition::default();
        let stats = stats();

        assert_eq!(
            composition.operator_count(&stats, PoolId::Lido, "1d").await.unwrap(),
            237
        );
        assert_eq!(
            composition.operator_count(&stats, PoolId::Stader, "1d").await.unwrap(),
            14
        );
        assert_eq!(
            composition.operator_count(&stats, PoolId::Swell, "1d").await.unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn test_single_operator_pool_skips_the_service() {
        let composition = PoolComposition::default();
        let stats = stats().with_operator_count("Frax", 99);

        assert_eq!(
            composition.operator_count(&stats, PoolId::Frax, "1d").await.unwrap(),
            1
        );
        assert_eq!(
            composition
                .validator_distribution(&stats, PoolId::Frax, 1000, "1d")
                .await
                .unwrap(),
            vec![1]
        );
    }

    #[tokio::test]
    async fn test_distributions_concatenate_in_label_order() {
        let distribution = PoolComposition::default()
            .validator_distribution(&stats(), PoolId::Lido, 1000, "1d")
            .await
            .unwrap();
        assert_eq!(distribution, vec![100, 200, 7]);
    }

    #[tokio::test]
    async fn test_pagination_collects_every_page() {
        let distribution = PoolComposition::default()
            .validator_distribution(&stats(), PoolId::Rocketpool, 1000, "1d")
            .await
            .unwrap();
        assert_eq!(distribution.len(), 2500);
        assert_eq!(distribution.first(), Some(&1));
        assert_eq!(distribution.last(), Some(&2500));
    }

    #[tokio::test]
    async fn test_empty_page_ends_walk() {
        let stats = EndlessPages::default();
        let distribution = PoolComposition::default()
            .validator_distribution(&stats, PoolId::Swell, 2, "1d")
            .await
            .unwrap();

        assert_eq!(distribution, vec![40, 60]);
        assert_eq!(stats.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_override_rule() {
        let composition =
            PoolComposition::default().with_source(PoolId::Swell, OperatorSource::SingleOperator);
        assert_eq!(composition.source(PoolId::Swell), &OperatorSource::SingleOperator);
        assert_eq!(
            composition.source(PoolId::Rocketpool),
            &OperatorSource::Labels(vec!["Rocketpool"])
        );
    }
}
