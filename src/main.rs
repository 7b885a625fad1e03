//! Graph Gateway
//!
//! Exposes knowledge-graph lookups as a small REST API.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  GRAPH GATEWAY                   │
//!                      │                                                  │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ───────────────────┼─▶│ routing │──▶│ handlers │──▶│ graph client │───┼──▶ SPARQL
//!                      │  │ tables  │   │ decode + │   │  (templates) │   │    endpoint
//!                      │  └─────────┘   │   host   │   └──────┬───────┘   │
//!                      │                └──────────┘          │           │
//!   Client Response    │  ┌──────────┐                        │           │
//!   ◀──────────────────┼──│ response │◀───────────────────────┘           │
//!                      │  │ encoder  │                                    │
//!                      │  └──────────┘                                    │
//!                      │   config · observability · lifecycle             │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use graph_gateway::config::{self, ConfigError, GatewayConfig};
use graph_gateway::lifecycle::startup;
use graph_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "graph-gateway")]
#[command(about = "REST gateway for knowledge-graph lookups", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Override sparql.endpoint.
    #[arg(long)]
    sparql_endpoint: Option<String>,
}

fn load(args: &Args) -> Result<GatewayConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(bind) = &args.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(endpoint) = &args.sparql_endpoint {
        config.sparql.endpoint = endpoint.clone();
    }

    config::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load(&args)?;

    logging::init(&config.observability);

    tracing::info!("graph-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        sparql_endpoint = %config.sparql.endpoint,
        request_timeout_secs = config.timeouts.request_secs,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
