//! Terminal rendering of pipeline results.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use lsd_rebalance_domain::entities::auction::ProposeRebalanceParams;
use lsd_rebalance_domain::{ByPool, FixedPoint, PoolId};
use lsd_rebalance_execution::prelude::{RebalanceProposal, WeightBreakdown};
use prettytable::{Table, row};
use serde::Serialize;
use uuid::Uuid;

/// JSON document printed by `propose`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
    pub basket: Address,
    pub nav: FixedPoint,
    pub target_units: &'a ByPool<FixedPoint>,
    pub propose_rebalance_params: &'a ProposeRebalanceParams,
}

impl<'a> ProposalDocument<'a> {
    pub fn new(basket: Address, proposal: &'a RebalanceProposal) -> Self {
        Self {
            generated_at: Utc::now(),
            run_id: proposal.run_id,
            basket,
            nav: proposal.nav,
            target_units: &proposal.target_units,
            propose_rebalance_params: &proposal.params,
        }
    }
}

pub fn weights_table(weights: &WeightBreakdown) -> Table {
    let mut table = Table::new();
    table.set_titles(row![
        "Pool",
        "Operators",
        "Operator factor",
        "HHI score",
        "HHI factor",
        "Target weight"
    ]);
    for pool in PoolId::ALL {
        table.add_row(row![
            pool.label(),
            r -> weights.operator_counts[pool],
            r -> format!("{:.6}", weights.operator_factors[pool]),
            r -> format!("{:.2}", weights.hhi_scores[pool]),
            r -> format!("{:.6}", weights.hhi_factors[pool]),
            r -> format!("{:.6}", weights.target_weights[pool])
        ]);
    }
    table
}

pub fn target_units_table(
    weights: &WeightBreakdown,
    exchange_rates: &ByPool<FixedPoint>,
    target_units: &ByPool<FixedPoint>,
) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Pool", "Component", "Exchange rate", "Weight", "Target unit"]);
    for pool in PoolId::ALL {
        table.add_row(row![
            pool.label(),
            pool.component_symbol(),
            r -> exchange_rates[pool],
            r -> format!("{:.6}", weights.target_weights[pool]),
            r -> target_units[pool]
        ]);
    }
    table
}
