//! Periodic chain status refresh.
//!
//! # Responsibilities
//! - Query block height, network name and daemon version on a fixed period
//! - Publish a complete snapshot that readers load without locking
//! - Keep the previous snapshot when a refresh fails

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::clock::Clock;
use crate::faucet::types::ChainInfo;
use crate::observability::metrics;
use crate::rpc::{RpcBackend, RpcResult};

/// Shared, atomically replaced [`ChainInfo`] snapshot.
#[derive(Clone, Default)]
pub struct ChainInfoHandle {
    inner: Arc<ArcSwap<ChainInfo>>,
}

impl ChainInfoHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<ChainInfo> {
        self.inner.load_full()
    }

    /// Replace the snapshot wholesale.
    pub fn store(&self, info: ChainInfo) {
        self.inner.store(Arc::new(info));
    }
}

/// Background task keeping a [`ChainInfoHandle`] current.
#[derive(Clone)]
pub struct ChainInfoRefresher {
    backend: Arc<dyn RpcBackend>,
    handle: ChainInfoHandle,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl ChainInfoRefresher {
    pub fn new(
        backend: Arc<dyn RpcBackend>,
        handle: ChainInfoHandle,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> Self {
        Self {
            backend,
            handle,
            clock,
            period,
        }
    }

    /// Run one refresh cycle.
    ///
    /// Both queries are issued together; the snapshot only changes when
    /// both succeed.
    pub async fn refresh_once(&self) -> RpcResult<Arc<ChainInfo>> {
        let (chain, daemon) =
            tokio::join!(self.backend.blockchain_info(), self.backend.daemon_info());
        let chain = chain?;
        let daemon = daemon?;

        self.handle.store(ChainInfo {
            height: chain.blocks,
            network_name: chain.chain,
            daemon_version: daemon.version_string(),
            last_refreshed_at: Some(self.clock.now()),
        });
        metrics::record_chain_height(chain.blocks);

        Ok(self.handle.load())
    }

    /// Refresh every period until shutdown. The first cycle runs immediately.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(period_secs = self.period.as_secs(), "Chain info refresher starting");

        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Chain info refresher received shutdown signal, exiting loop");
                    break;
                }
                _ = ticker.tick() => {
                    match self.refresh_once().await {
                        Ok(info) => tracing::debug!(
                            height = info.height,
                            network = %info.network_name,
                            version = %info.daemon_version,
                            "Chain info refreshed"
                        ),
                        Err(e) => {
                            metrics::record_chain_refresh_failure();
                            tracing::warn!(error = %e, "Chain info refresh failed, keeping previous snapshot");
                        }
                    }
                }
            }
        }
    }
}
