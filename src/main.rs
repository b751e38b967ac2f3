//! Currency exchange-rate gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request    ┌──────────────────────────────────────────────┐
//!     ─────────────────▶│ http::server (CORS, request ID, tracing)     │
//!                       │     │                                        │
//!                       │     ▼                                        │
//!                       │ http::handlers ──▶ rates (validate, batch)   │
//!                       │     │                   │                    │
//!                       │     ▼                   ▼                    │
//!                       │ upstream::client (one GET per pair)  ────────┼──▶ Frankfurter
//!                       │     │                                        │
//!     Client Response   │     ▼                                        │
//!     ◀─────────────────│ http::response (JSON body / ApiError)        │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use rates_gateway::config::{load_config, GatewayConfig};
use rates_gateway::lifecycle::startup;
use rates_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "rates-gateway")]
#[command(about = "HTTP gateway for currency exchange rates", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("rates-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        batch_timeout_secs = config.upstream.batch_timeout_secs,
        supported_currencies = config.currencies.supported.len(),
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
