//! Facade over the faucet subsystems used by the HTTP front end.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::clock::{Clock, SystemClock};
use crate::config::FaucetConfig;
use crate::faucet::address::classify;
use crate::faucet::chain_info::{ChainInfoHandle, ChainInfoRefresher};
use crate::faucet::dispenser::{Dispenser, DispenserSettings};
use crate::faucet::error::{FaucetError, FaucetResult};
use crate::faucet::ledger::OperationLedger;
use crate::faucet::throttle::ThrottleCache;
use crate::faucet::types::{ChainInfo, ClaimRequest, DisbursementOperation, KnownAddress};
use crate::lifecycle::Shutdown;
use crate::rpc::{collect_addresses, RpcBackend, RpcResult, TotalBalance};

/// Answers "can this requester claim now, and did the claim succeed".
pub struct Coordinator {
    backend: Arc<dyn RpcBackend>,
    clock: Arc<dyn Clock>,
    throttle: Arc<ThrottleCache>,
    ledger: Arc<OperationLedger>,
    dispenser: Arc<Dispenser>,
    chain_info: ChainInfoHandle,
    refresher: ChainInfoRefresher,
    sweep_interval: Duration,
}

impl Coordinator {
    /// Build all subsystems from configuration using the system clock.
    pub fn new(config: &FaucetConfig, backend: Arc<dyn RpcBackend>) -> Self {
        Self::with_clock(config, backend, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &FaucetConfig,
        backend: Arc<dyn RpcBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let throttle = Arc::new(ThrottleCache::new(
            Duration::from_secs(config.throttle.cooldown_secs),
            clock.clone(),
        ));
        let ledger = Arc::new(OperationLedger::new());
        let dispenser = Arc::new(Dispenser::new(
            backend.clone(),
            throttle.clone(),
            ledger.clone(),
            clock.clone(),
            DispenserSettings::from(config),
        ));
        let chain_info = ChainInfoHandle::new();
        let refresher = ChainInfoRefresher::new(
            backend.clone(),
            chain_info.clone(),
            clock.clone(),
            Duration::from_secs(config.chain_info.refresh_secs),
        );

        Self {
            backend,
            clock,
            throttle,
            ledger,
            dispenser,
            chain_info,
            refresher,
            sweep_interval: Duration::from_secs(config.throttle.sweep_interval_secs),
        }
    }

    /// Validate, throttle and dispense one claim.
    ///
    /// The dispense runs on its own task: dropping the returned future
    /// (client gone, request timeout) does not stop polling, and the
    /// operation still reaches a final status in the ledger.
    pub async fn submit_claim(
        &self,
        requester: &str,
        address: &str,
    ) -> FaucetResult<DisbursementOperation> {
        let claim = ClaimRequest::new(requester, address, self.clock.now());
        let dispenser = self.dispenser.clone();
        let task = tokio::spawn(async move { dispenser.dispense(&claim).await });

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::error!(error = %e, "Disbursement task cancelled");
                Err(FaucetError::Internal(e.to_string()))
            }
        }
    }

    /// Latest chain status snapshot.
    pub fn chain_info(&self) -> Arc<ChainInfo> {
        self.chain_info.load()
    }

    /// Refresh the chain status now instead of waiting for the next cycle.
    pub async fn refresh_chain_info(&self) -> RpcResult<Arc<ChainInfo>> {
        self.refresher.refresh_once().await
    }

    pub fn operation_status(&self, operation_id: &str) -> FaucetResult<DisbursementOperation> {
        self.ledger
            .get(operation_id)
            .ok_or_else(|| FaucetError::NotFound(operation_id.to_string()))
    }

    /// Every recorded operation, newest first.
    pub fn operations(&self) -> Vec<DisbursementOperation> {
        self.ledger.list()
    }

    /// Wallet addresses, shielded first, each with its classification.
    pub async fn known_addresses(&self) -> FaucetResult<Vec<KnownAddress>> {
        let (shielded, groupings) = tokio::join!(
            self.backend.list_shielded_addresses(),
            self.backend.list_address_groupings()
        );
        let shielded = shielded.map_err(FaucetError::Backend)?;
        let groupings = groupings.map_err(FaucetError::Backend)?;

        Ok(shielded
            .into_iter()
            .chain(collect_addresses(&groupings))
            .map(|address| KnownAddress {
                kind: classify(&address),
                address,
            })
            .collect())
    }

    /// Funding wallet balance.
    pub async fn balance(&self) -> FaucetResult<TotalBalance> {
        self.backend.total_balance().await.map_err(FaucetError::Backend)
    }

    /// Configured per-claim amount.
    pub fn amount(&self) -> f64 {
        self.dispenser.settings().amount
    }

    pub fn throttle(&self) -> &ThrottleCache {
        &self.throttle
    }

    /// Start the throttle sweeper and chain info refresher.
    pub fn spawn_background(&self, shutdown: &Shutdown) -> Vec<JoinHandle<()>> {
        vec![
            tokio::spawn(
                self.throttle
                    .clone()
                    .run_sweeper(self.sweep_interval, shutdown.subscribe()),
            ),
            tokio::spawn(self.refresher.clone().run(shutdown.subscribe())),
        ]
    }
}
