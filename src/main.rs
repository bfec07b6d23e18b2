//! Allowlisted outbound reverse-proxy gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                      GATEWAY                          │
//!   Client Request     │  ┌─────────┐   ┌───────────┐   ┌─────────────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│ X-Target- │──▶│   allowlist     │   │
//!   X-Target-URL: ...  │  │ server  │   │ URL       │   │   (SSRF guard)  │   │
//!                      │  └─────────┘   └───────────┘   └────────┬────────┘   │
//!                      │                                         ▼            │
//!                      │                                 ┌─────────────────┐  │
//!                      │                                 │ header sanitize │  │
//!                      │                                 └────────┬────────┘  │
//!                      │                                          ▼           │
//!   Client Response    │  ┌──────────┐                   ┌─────────────────┐  │
//!   ◀──────────────────┼──│ response │◀──── stream ──────│   forwarder     │◀─┼── Upstream
//!                      │  │  relay   │                   │ (reqwest client)│  │
//!                      │  └──────────┘                   └─────────────────┘  │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use target_gateway::config::load_config;
use target_gateway::http::HttpServer;
use target_gateway::lifecycle::{signals, startup, Shutdown};
use target_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "target-gateway")]
#[command(about = "Allowlisted outbound reverse-proxy gateway", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging settings come from the file before the rest is validated.
    let observability = load_config(cli.config.as_deref())?.observability;
    logging::init_logging(&observability);

    tracing::info!("target-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let startup::Bootstrap { config, allowlist } =
        startup::bootstrap(cli.config.as_deref(), cli.bind)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_path = %config.listener.mount_path,
        allowlist = ?allowlist.entries(),
        connect_timeout_secs = ?config.upstream.connect_timeout_secs,
        read_timeout_secs = ?config.upstream.read_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::forward_signals(shutdown.clone()));

    let server = HttpServer::new(config, allowlist)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
