//! Wallet adapter: serves a few REST endpoints by calling the daemon's JSON-RPC API.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mevacoin_proxy::adapter::{setup_adapter_router, RpcClient};
use mevacoin_proxy::config::loader::{finalize, load_layered};
use mevacoin_proxy::lifecycle::shutdown::on_signal;
use mevacoin_proxy::lifecycle::signals::wait_for_shutdown_signal;
use mevacoin_proxy::observability::logging;
use mevacoin_proxy::Shutdown;

#[derive(Parser)]
#[command(name = "wallet-adapter")]
#[command(about = "REST to JSON-RPC adapter for the Mevacoin daemon", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Daemon JSON-RPC endpoint (overrides MEVACOIND_RPC_URL)
    #[arg(short, long)]
    rpc_url: Option<String>,

    /// Listen address (overrides ADAPTER_BIND)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_layered(cli.config.as_deref())?;
    if let Some(url) = cli.rpc_url {
        config.adapter.rpc_url = url;
    }
    if let Some(bind) = cli.bind {
        config.adapter.bind_address = bind;
    }
    let config = finalize(config)?;

    logging::init_logging(
        config.observability.log_format,
        "mevacoin_proxy=info,wallet_adapter=info,tower_http=info",
    );

    let listener = TcpListener::bind(&config.adapter.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        rpc_url = %config.adapter.rpc_url,
        "Wallet adapter listening"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    let app = setup_adapter_router(RpcClient::new(config.adapter.rpc_url));
    axum::serve(listener, app)
        .with_graceful_shutdown(on_signal(server_shutdown))
        .await?;

    tracing::info!("Wallet adapter stopped");
    Ok(())
}
