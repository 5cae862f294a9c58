//! Dining ring CLI.
//!
//! Seats a table, lets it run until Ctrl-C or `--seconds` elapse, then shuts
//! it down and prints how many meals each actor had.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use dining_ring::config::TableConfig;
use dining_ring::lifecycle::{setup_tracing, Table};
use dining_ring::observers::TracingObserver;
use dining_ring::scheduler::OrderPolicy;

#[derive(Parser)]
#[command(name = "dining-ring")]
#[command(about = "Run actors around a ring of shared resources without deadlock")]
struct Cli {
    /// JSON configuration file; flags below override it
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Number of actors (at least 3)
    #[arg(long, short)]
    actors: Option<usize>,

    /// Which actors reach right-first
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// Seed for repeatable timings
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long, short)]
    seconds: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    SingleReversal,
    Alternating,
}

impl From<OrderArg> for OrderPolicy {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::SingleReversal => OrderPolicy::SingleReversal,
            OrderArg::Alternating => OrderPolicy::Alternating,
        }
    }
}

async fn load_config(cli: &Cli) -> Result<TableConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            TableConfig::from_json(&text)?
        }
        None => TableConfig::default(),
    };
    if let Some(actors) = cli.actors {
        config = config.with_actors(actors);
    }
    if let Some(order) = cli.order {
        config = config.with_order(order.into());
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli).await?;
    let table = Table::start(config, Arc::new(TracingObserver))?;

    match cli.seconds {
        Some(seconds) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
                signal = tokio::signal::ctrl_c() => signal?,
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }

    let report = table.shutdown().await?;
    for actor in &report.actors {
        info!(
            actor = %actor.actor,
            meals = actor.meals,
            longest_wait = ?actor.longest_wait,
            "Summary"
        );
    }
    info!(total_meals = report.total_meals(), "Done");
    Ok(())
}
