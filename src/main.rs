//! Mevacoin JSON proxy.
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ relay handler ──▶ outbound request ───────┼──▶ Backend
//!                           │   (any method,      (headers minus host,     │    (daemon)
//!                           │    any path)         JSON body unless GET)   │
//!                           │                                              │
//!     Client Response       │   content-type contains application/json?   │
//!     ◀─────────────────────┼── yes: decode → fee normalizer → encode ◀───┼─── Response
//!                           │   no:  status + headers + bytes as is       │
//!                           │   failure: 502 {"error": "proxy_error"}     │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mevacoin_proxy::config::loader::{finalize, load_layered};
use mevacoin_proxy::observability::{logging, metrics};
use mevacoin_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "mevacoin-proxy")]
#[command(about = "Reverse proxy for the Mevacoin daemon that normalizes transaction fees", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend origin (overrides BACKEND_URL)
    #[arg(short, long)]
    backend_url: Option<String>,

    /// Listening port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_layered(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    let config = finalize(config)?;

    logging::init_logging(
        config.observability.log_format,
        "mevacoin_proxy=info,tower_http=info",
    );

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend.url,
        port = config.listener.port,
        max_body_bytes = config.limits.max_body_bytes,
        normalizer = config.normalizer.enabled,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        mevacoin_proxy::lifecycle::signals::wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
