//! # custody-node
//!
//! Runs one Agri-Custody ledger node in the foreground.
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration (defaults, then `--config` JSON, then `AC_*` env)
//! 3. Validate configuration
//! 4. Initialize logging (`RUST_LOG` wins over the configured filter)
//! 5. Build the node and stream committed events to the log until Ctrl+C

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use node_runtime::{LedgerNode, NodeConfig};
use shared_bus::EventFilter;

#[derive(Parser, Debug)]
#[command(name = "custody-node")]
#[command(about = "Agri-Custody ledger node", version)]
struct Cli {
    /// JSON configuration file; missing sections keep their defaults
    #[arg(short, long, env = "AC_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter directive, overriding the configured one
    #[arg(long)]
    log: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Build the node, report its state and exit
    #[arg(long)]
    check: bool,
}

fn load_config(cli: &Cli) -> Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            NodeConfig::from_json(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => NodeConfig::default(),
    };
    config
        .apply_env(|var| std::env::var(var).ok())
        .context("applying environment overrides")?;
    if let Some(filter) = &cli.log {
        config.logging.filter = filter.clone();
    }
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn init_tracing(config: &NodeConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("building log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.logging.with_target)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_tracing(&config)?;
    info!("===========================================");
    info!("  Agri-Custody Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let node = LedgerNode::new(config).context("building ledger node")?;

    if cli.check {
        info!(
            actors = ac_01_identity_registry::IdentityApi::actor_count(node.identity()),
            entries = ac_06_provenance::ProvenanceApi::entry_count(node.provenance()),
            "Node check passed"
        );
        return Ok(());
    }

    let mut events = node.subscribe(EventFilter::all());
    info!("Node is running. Press Ctrl+C to stop.");
    loop {
        tokio::select! {
            next = events.recv() => match next {
                Some(event) => info!(
                    index = event.global_index,
                    scope = %event.scope,
                    operation = event.operation(),
                    "Committed"
                ),
                None => {
                    warn!("Event bus closed");
                    break;
                }
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("waiting for Ctrl+C")?;
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutdown complete");
    Ok(())
}
