//! statuswatch entry point.
//!
//! Modes:
//! - `run`: start the scheduler and block until a termination signal
//! - `once`: execute exactly one check cycle and exit
//! - `cleanup`: one retention pass over stored history

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use statuswatch::config::{self, ResolvedConfig};
use statuswatch::lifecycle::{signals, Shutdown};
use statuswatch::scheduler::{run_cleanup, CheckCycle, Scheduler};
use statuswatch::store::{CheckStore, FileStore, MemoryStore};

#[derive(Parser)]
#[command(name = "statuswatch", about = "Service health monitor and alerter")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "statuswatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scheduler until terminated.
    Run,
    /// Run one health check cycle and exit.
    Once,
    /// Delete check records older than the retention period.
    Cleanup {
        /// Retention period in days (overrides the configured value).
        #[arg(long)]
        days: Option<u32>,
        /// Report what would be deleted without deleting.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statuswatch=info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = config::load_config(&cli.config)?;
    tracing::info!(
        services = config.services.len(),
        interval_secs = config.checks.interval_secs,
        "Configuration loaded"
    );

    let store = open_store(&config)?;

    match cli.command {
        Command::Run => run_forever(config, store).await,
        Command::Once => {
            let mut cycle = CheckCycle::new(&config, store);
            cycle.run().await;
        }
        Command::Cleanup { days, dry_run } => {
            let retention_days = days.unwrap_or(config.retention.days);
            run_cleanup(store.as_ref(), retention_days, dry_run);
        }
    }

    Ok(())
}

fn open_store(config: &ResolvedConfig) -> Result<Arc<dyn CheckStore>, Box<dyn std::error::Error>> {
    match &config.storage.path {
        Some(path) => Ok(Arc::new(FileStore::open(path)?)),
        None => {
            tracing::warn!("No storage path configured, history will not survive restarts");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn run_forever(config: ResolvedConfig, store: Arc<dyn CheckStore>) {
    let shutdown = Shutdown::new();
    let cycle = CheckCycle::new(&config, Arc::clone(&store));
    let scheduler = Scheduler::start(
        cycle,
        store,
        Duration::from_secs(config.checks.interval_secs),
        config.retention.clone(),
        &shutdown,
    );

    signals::wait_for_termination().await;

    tracing::info!("Shutting down, waiting for running jobs to finish");
    shutdown.trigger();
    scheduler.join().await;
    tracing::info!("Shutdown complete");
}
