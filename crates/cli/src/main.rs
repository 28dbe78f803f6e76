//! Command line interface for the LSD basket rebalancer.

mod output;

use alloy_primitives::Address;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use lsd_rebalance_data::OperatorStatsProvider;
use lsd_rebalance_data::providers::{
    DEFAULT_RATED_API_URL, DEFAULT_WINDOW, RatedProvider, StaticOperatorStats,
};
use lsd_rebalance_domain::ByPool;
use lsd_rebalance_execution::prelude::*;
use lsd_rebalance_protocols::PriceCurveEncoder;
use lsd_rebalance_protocols::addresses::DSETH;
use lsd_rebalance_protocols::onchain::{OnchainMarketData, connect_http};
use lsd_rebalance_protocols::price_adapter::{LocalPriceAdapter, OnchainPriceAdapter};
use output::{ProposalDocument, target_units_table, weights_table};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "lsd-rebalance")]
#[command(about = "Decentralization-weighted rebalancing for LSD basket tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute target weights and target units for the basket
    TargetUnits(RunArgs),
    /// Print the full rebalance proposal as JSON
    Propose(RunArgs),
    /// Compute weights offline from operator data given on the command line
    Weights {
        /// Operator count per pool, in pool order (e.g. 35,2188,5,1,8,14)
        #[arg(long, value_delimiter = ',', required = true)]
        counts: Vec<u64>,

        /// Validator counts per operator; pools separated by ';' (e.g. "100,200;1;1;1;1;1,1")
        #[arg(long)]
        distribution: String,
    },
    /// Exchange operator-stats credentials for an access token
    Auth {
        #[arg(long, env = "RATED_API_URL", default_value = DEFAULT_RATED_API_URL)]
        rated_url: String,

        #[arg(long, env = "RATED_USERNAME")]
        username: String,

        #[arg(long, env = "RATED_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Ethereum JSON-RPC endpoint
    #[arg(long, env = "MAINNET_RPC_URL")]
    rpc_url: String,

    /// Basket token address
    #[arg(long, env = "BASKET_ADDRESS", default_value_t = DSETH)]
    basket: Address,

    /// Operator statistics API base URL
    #[arg(long, env = "RATED_API_URL", default_value = DEFAULT_RATED_API_URL)]
    rated_url: String,

    /// Operator statistics API access token
    #[arg(long, env = "RATED_API_ACCESS_TOKEN", hide_env_values = true)]
    rated_token: Option<String>,

    /// Aggregation window of operator statistics
    #[arg(long, default_value = DEFAULT_WINDOW)]
    window: String,

    /// Operators per page when paging through validator counts
    #[arg(long, default_value_t = 1000)]
    page_size: usize,

    /// Use one operator with one validator for every label instead of the API
    #[arg(long)]
    mock_rated: bool,

    /// JSON file overriding auction defaults
    #[arg(long)]
    auction_config: Option<PathBuf>,

    /// Encode price curves locally instead of calling the adapter contract
    #[arg(long)]
    local_encoder: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::TargetUnits(args) => {
            let proposer = build_proposer(&args)?;
            let weights = proposer.weights().await?;
            let snapshot = proposer.snapshot().await?;
            let target_units = proposer.target_units(&weights.target_weights, &snapshot)?;

            weights_table(&weights).printstd();
            println!();
            println!("NAV: {} ETH", snapshot.nav()?);
            target_units_table(&weights, &snapshot.exchange_rates, &target_units).printstd();
        }
        Commands::Propose(args) => {
            let proposal = build_proposer(&args)?.run().await?;
            let document = ProposalDocument::new(args.basket, &proposal);
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Commands::Weights {
            counts,
            distribution,
        } => {
            let counts = ByPool::try_from_vec(counts).context("one operator count per pool")?;
            let distribution = ByPool::try_from_vec(parse_distribution(&distribution)?)
                .context("one validator distribution per pool")?;
            let weights = WeightBreakdown::compute(counts, distribution)?;
            weights_table(&weights).printstd();
        }
        Commands::Auth {
            rated_url,
            username,
            password,
        } => {
            let password = Zeroizing::new(password);
            let token = Zeroizing::new(
                RatedProvider::authenticate(&rated_url, &username, &password).await?,
            );
            println!("{}", token.as_str());
        }
    }

    Ok(())
}

fn build_proposer(args: &RunArgs) -> Result<RebalanceProposer> {
    let auction_config = match &args.auction_config {
        Some(path) => AuctionConfig::from_json_file(path)?,
        None => AuctionConfig::default(),
    };

    let rated = rated_config(args);
    let stats: Arc<dyn OperatorStatsProvider> = if args.mock_rated {
        info!("Using static operator statistics");
        Arc::new(StaticOperatorStats::default())
    } else {
        if rated.access_token.is_empty() {
            bail!("RATED_API_ACCESS_TOKEN must be set unless --mock-rated is given");
        }
        Arc::new(RatedProvider::new(&rated.base_url, rated.access_token.as_str())?)
    };

    let provider = connect_http(&args.rpc_url)?;
    let encoder: Arc<dyn PriceCurveEncoder> = if args.local_encoder {
        Arc::new(LocalPriceAdapter)
    } else {
        Arc::new(OnchainPriceAdapter::new(
            provider.clone(),
            auction_config.price_adapter_address,
        ))
    };
    let market = Arc::new(OnchainMarketData::mainnet(provider));

    Ok(RebalanceProposer::new(
        market,
        stats,
        AuctionParamsBuilder::new(auction_config, encoder),
        args.basket,
    )
    .with_stats_query(&rated.window, rated.page_size))
}

fn rated_config(args: &RunArgs) -> RatedConfig {
    RatedConfig::new(args.rated_token.clone().unwrap_or_default())
        .with_base_url(&args.rated_url)
        .with_query(&args.window, args.page_size)
}

/// Parses `"100,200;1;;1,1"` into one list per pool. An empty segment is a
/// pool with no reported operators.
fn parse_distribution(raw: &str) -> Result<Vec<Vec<u64>>> {
    raw.split(';')
        .map(|pool| {
            pool.split(',')
                .map(str::trim)
                .filter(|count| !count.is_empty())
                .map(|count| {
                    count
                        .parse::<u64>()
                        .with_context(|| format!("invalid validator count {count:?}"))
                })
                .collect()
        })
        .collect()
}
