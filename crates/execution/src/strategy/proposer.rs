//! End-to-end rebalance proposal.

use super::auction::AuctionParamsBuilder;
use crate::composition::PoolComposition;
use crate::snapshot::MarketSnapshot;
use alloy_primitives::Address;
use lsd_rebalance_data::OperatorStatsProvider;
use lsd_rebalance_domain::entities::auction::ProposeRebalanceParams;
use lsd_rebalance_domain::metrics::target_units::target_units;
use lsd_rebalance_domain::metrics::weight_factors::{
    hhi_weight_factors, operator_weight_factors, protocol_hhi_scores, target_weights,
};
use lsd_rebalance_domain::{ByPool, FixedPoint, PoolId, Result};
use lsd_rebalance_protocols::MarketDataGateway;
use serde::Serialize;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Every intermediate of the weighting stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightBreakdown {
    pub operator_counts: ByPool<u64>,
    pub validator_distribution: ByPool<Vec<u64>>,
    pub operator_factors: ByPool<f64>,
    pub hhi_scores: ByPool<f64>,
    pub hhi_factors: ByPool<f64>,
    pub target_weights: ByPool<f64>,
}

impl WeightBreakdown {
    /// Runs the weight factor engine over already fetched operator data.
    pub fn compute(
        operator_counts: ByPool<u64>,
        validator_distribution: ByPool<Vec<u64>>,
    ) -> Result<Self> {
        let operator_factors = operator_weight_factors(operator_counts.values())?;
        Self::with_operator_factors(operator_counts, operator_factors, validator_distribution)
    }

    /// Completes the breakdown from operator factors derived out of `operator_counts`.
    pub fn with_operator_factors(
        operator_counts: ByPool<u64>,
        operator_factors: Vec<f64>,
        validator_distribution: ByPool<Vec<u64>>,
    ) -> Result<Self> {
        let hhi_scores = protocol_hhi_scores(validator_distribution.values());
        let hhi_factors = hhi_weight_factors(&hhi_scores);
        let weights = target_weights(&operator_factors, &hhi_factors)?;

        Ok(Self {
            operator_counts,
            validator_distribution,
            operator_factors: ByPool::try_from_vec(operator_factors)?,
            hhi_scores: ByPool::try_from_vec(hhi_scores)?,
            hhi_factors: ByPool::try_from_vec(hhi_factors)?,
            target_weights: ByPool::try_from_vec(weights)?,
        })
    }
}

/// Output of a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceProposal {
    pub run_id: Uuid,
    pub weights: WeightBreakdown,
    pub exchange_rates: ByPool<FixedPoint>,
    pub nav: FixedPoint,
    pub target_units: ByPool<FixedPoint>,
    pub params: ProposeRebalanceParams,
}

/// Sequences the pipeline for one basket:
/// operator data → weights → market snapshot → target units → auctions.
pub struct RebalanceProposer {
    market: Arc<dyn MarketDataGateway>,
    stats: Arc<dyn OperatorStatsProvider>,
    auction: AuctionParamsBuilder,
    composition: PoolComposition,
    basket: Address,
    window: String,
    page_size: usize,
}

impl RebalanceProposer {
    pub fn new(
        market: Arc<dyn MarketDataGateway>,
        stats: Arc<dyn OperatorStatsProvider>,
        auction: AuctionParamsBuilder,
        basket: Address,
    ) -> Self {
        Self {
            market,
            stats,
            auction,
            composition: PoolComposition::default(),
            basket,
            window: lsd_rebalance_data::providers::DEFAULT_WINDOW.to_string(),
            page_size: 1000,
        }
    }

    pub fn with_composition(mut self, composition: PoolComposition) -> Self {
        self.composition = composition;
        self
    }

    /// Window and page size used against the operator statistics service.
    pub fn with_stats_query(mut self, window: impl Into<String>, page_size: usize) -> Self {
        self.window = window.into();
        self.page_size = page_size.max(1);
        self
    }

    pub async fn operator_counts(&self) -> Result<ByPool<u64>> {
        let mut counts = ByPool::from_fn(|_| 0);
        for pool in PoolId::ALL {
            counts[pool] = self
                .composition
                .operator_count(self.stats.as_ref(), pool, &self.window)
                .await?;
        }
        info!(counts = ?counts.values(), "Node operator counts");
        Ok(counts)
    }

    pub async fn validator_distribution(&self) -> Result<ByPool<Vec<u64>>> {
        let mut distribution = ByPool::from_fn(|_| Vec::new());
        for pool in PoolId::ALL {
            distribution[pool] = self
                .composition
                .validator_distribution(self.stats.as_ref(), pool, self.page_size, &self.window)
                .await?;
        }
        info!(
            operators = ?distribution.values().iter().map(Vec::len).collect::<Vec<_>>(),
            "Validator distribution"
        );
        Ok(distribution)
    }

    /// Operator factors are settled before any distribution page is requested.
    pub async fn weights(&self) -> Result<WeightBreakdown> {
        let counts = self.operator_counts().await?;
        let operator_factors = operator_weight_factors(counts.values())?;
        let distribution = self.validator_distribution().await?;
        let breakdown =
            WeightBreakdown::with_operator_factors(counts, operator_factors, distribution)?;
        info!(weights = ?breakdown.target_weights.values(), "Target weights");
        Ok(breakdown)
    }

    pub async fn snapshot(&self) -> Result<MarketSnapshot> {
        MarketSnapshot::fetch(Arc::clone(&self.market), self.basket).await
    }

    /// `nav * weight / rate` per pool, against one snapshot.
    pub fn target_units(
        &self,
        weights: &ByPool<f64>,
        snapshot: &MarketSnapshot,
    ) -> Result<ByPool<FixedPoint>> {
        let nav = snapshot.nav()?;
        target_units(weights, nav, &snapshot.exchange_rates)
    }

    pub async fn propose_rebalance_params(
        &self,
        snapshot: &MarketSnapshot,
        target_units: &ByPool<FixedPoint>,
    ) -> Result<ProposeRebalanceParams> {
        self.auction.build(snapshot, target_units).await
    }

    /// Runs every stage; the first failure aborts the run.
    pub async fn run(&self) -> Result<RebalanceProposal> {
        let run_id = Uuid::new_v4();
        let span = info_span!("rebalance_run", run_id = %run_id, basket = %self.basket);
        self.run_stages(run_id).instrument(span).await
    }

    async fn run_stages(&self, run_id: Uuid) -> Result<RebalanceProposal> {
        info!("Starting rebalance run");
        let weights = self.weights().await?;
        let snapshot = self.snapshot().await?;
        let nav = snapshot.nav()?;
        info!(nav = %nav, "Basket NAV");

        let target_units = self.target_units(&weights.target_weights, &snapshot)?;
        for (pool, units) in target_units.iter() {
            info!(pool = %pool, target_unit = %units, "Target unit");
        }

        let params = self.propose_rebalance_params(&snapshot, &target_units).await?;
        info!(
            old = params.old_components.len(),
            new = params.new_components.len(),
            "Rebalance parameters ready"
        );

        Ok(RebalanceProposal {
            run_id,
            weights,
            exchange_rates: snapshot.exchange_rates,
            nav,
            target_units,
            params,
        })
    }
}
