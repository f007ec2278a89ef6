//! Testnet Faucet (v1)
//!
//! Hands out small amounts of testnet funds from an operator wallet.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                     FAUCET                       │
//!   HTTP claim    │  ┌────────┐    ┌─────────────┐    ┌───────────┐  │
//!   ──────────────┼─▶│  http  │───▶│ coordinator │───▶│ dispenser │──┼──▶ wallet daemon
//!                 │  └────────┘    └──────┬──────┘    └─────┬─────┘  │    (JSON-RPC)
//!                 │                       │                 │        │
//!                 │                ┌──────▼──────┐   ┌──────▼─────┐  │
//!                 │                │ chain info  │   │ throttle + │  │
//!                 │                │  refresher  │   │   ledger   │  │
//!                 │                └─────────────┘   └────────────┘  │
//!                 └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use testnet_faucet::config::load_config;
use testnet_faucet::lifecycle::{signals, Shutdown};
use testnet_faucet::observability::{logging, metrics};
use testnet_faucet::rpc::JsonRpcClient;
use testnet_faucet::{Coordinator, FaucetServer};

#[derive(Parser)]
#[command(name = "faucet", version, about = "Testnet faucet service")]
struct Args {
    /// TOML configuration file. FAUCET_* environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!("testnet-faucet v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_endpoint = %config.rpc.endpoint(),
        funding_address = %config.faucet.funding_address,
        amount = config.faucet.amount,
        cooldown_secs = config.throttle.cooldown_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let backend = Arc::new(JsonRpcClient::new(&config.rpc)?);
    let coordinator = Arc::new(Coordinator::new(&config, backend));

    let shutdown = Shutdown::new();
    let background = coordinator.spawn_background(&shutdown);

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let tls = config.listener.tls.clone();
    let server = FaucetServer::new(config.clone(), coordinator);
    match tls {
        Some(tls) => server.run_tls(&tls, shutdown.subscribe()).await?,
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    // The server may also stop on its own error; make sure tasks follow.
    shutdown.trigger();
    for task in background {
        let _ = task.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
