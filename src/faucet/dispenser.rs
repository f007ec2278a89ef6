//! Disbursement submission and operation polling.
//!
//! # State Machine
//! ```text
//! validate → admit → reserve → submit ──error──▶ release, SubmissionFailed
//!                                 │
//!                                 ▼
//!                              Pending ──poll──▶ Success
//!                                 │      └────▶ Failed
//!                                 └─ceiling──▶ TimedOut
//! ```
//!
//! Once the backend has accepted a submission the reservation is kept even
//! if the operation later fails or times out: the transfer may still land,
//! so an immediate retry could fund the same requester twice.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::sleep;

use crate::clock::Clock;
use crate::config::FaucetConfig;
use crate::faucet::address::validate_claim_address;
use crate::faucet::error::{FaucetError, FaucetResult};
use crate::faucet::ledger::OperationLedger;
use crate::faucet::throttle::{Reservation, ThrottleCache};
use crate::faucet::types::{ClaimRequest, DisbursementOperation, OperationStatus};
use crate::observability::metrics;
use crate::rpc::{Recipient, Resolution, RpcBackend};

/// Tunables for [`Dispenser`].
#[derive(Debug, Clone)]
pub struct DispenserSettings {
    pub funding_address: String,
    pub amount: f64,
    pub poll_interval: Duration,
    pub poll_attempts: u32,
    /// 0 disables admission control.
    pub max_in_flight: usize,
    pub release_on_failed_operation: bool,
}

impl From<&FaucetConfig> for DispenserSettings {
    fn from(config: &FaucetConfig) -> Self {
        Self {
            funding_address: config.faucet.funding_address.clone(),
            amount: config.faucet.amount,
            poll_interval: Duration::from_millis(config.faucet.poll_interval_ms),
            poll_attempts: config.faucet.poll_attempts,
            max_in_flight: config.faucet.max_in_flight,
            release_on_failed_operation: config.throttle.release_on_failed_operation,
        }
    }
}

/// Drives one claim from validation to a resolved backend operation.
pub struct Dispenser {
    backend: Arc<dyn RpcBackend>,
    throttle: Arc<ThrottleCache>,
    ledger: Arc<OperationLedger>,
    clock: Arc<dyn Clock>,
    permits: Option<Arc<Semaphore>>,
    settings: DispenserSettings,
}

impl Dispenser {
    pub fn new(
        backend: Arc<dyn RpcBackend>,
        throttle: Arc<ThrottleCache>,
        ledger: Arc<OperationLedger>,
        clock: Arc<dyn Clock>,
        settings: DispenserSettings,
    ) -> Self {
        let permits = (settings.max_in_flight > 0)
            .then(|| Arc::new(Semaphore::new(settings.max_in_flight)));
        Self {
            backend,
            throttle,
            ledger,
            clock,
            permits,
            settings,
        }
    }

    pub fn settings(&self) -> &DispenserSettings {
        &self.settings
    }

    /// Process one claim.
    pub async fn dispense(&self, claim: &ClaimRequest) -> FaucetResult<DisbursementOperation> {
        let result = self.try_dispense(claim).await;
        match &result {
            Ok(op) => {
                metrics::record_claim("success");
                tracing::info!(
                    requester = %claim.requester,
                    address = %claim.address,
                    operation_id = %op.operation_id,
                    txid = ?op.transaction_id,
                    "Disbursement succeeded"
                );
            }
            Err(e) => {
                metrics::record_claim(e.outcome());
                tracing::info!(
                    requester = %claim.requester,
                    address = %claim.address,
                    outcome = e.outcome(),
                    error = %e,
                    "Claim not fulfilled"
                );
            }
        }
        result
    }

    async fn try_dispense(&self, claim: &ClaimRequest) -> FaucetResult<DisbursementOperation> {
        let kind = validate_claim_address(&claim.address)?;
        let _permit = self.admit()?;

        if let Reservation::Denied { retry_not_before } = self.throttle.try_reserve(&claim.requester) {
            let remaining_ms = (retry_not_before - self.clock.now()).num_milliseconds().max(0) as u64;
            return Err(FaucetError::Throttled {
                retry_not_before,
                retry_after_secs: remaining_ms.div_ceil(1000).max(1),
            });
        }

        tracing::debug!(
            requester = %claim.requester,
            address = %claim.address,
            kind = ?kind,
            amount = self.settings.amount,
            "Submitting disbursement"
        );

        let recipients = [Recipient {
            address: claim.address.clone(),
            amount: self.settings.amount,
        }];
        let operation_id = match self
            .backend
            .send_many(&self.settings.funding_address, &recipients)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                // Nothing reached the wallet; let the requester try again.
                self.throttle.release(&claim.requester);
                tracing::warn!(requester = %claim.requester, error = %e, "Disbursement submission failed");
                return Err(FaucetError::SubmissionFailed(e));
            }
        };

        let mut operation = DisbursementOperation::pending(
            operation_id.clone(),
            claim,
            self.settings.amount,
            self.clock.now(),
        );
        self.ledger.record(operation.clone());

        let (resolution, attempts) = self.poll_until_resolved(&operation_id).await;
        metrics::record_poll_attempts(attempts);

        operation.updated_at = self.clock.now();
        match resolution {
            Some(Resolution::Success { txid }) => {
                operation.status = OperationStatus::Success;
                operation.transaction_id = txid;
            }
            Some(Resolution::Failed { message }) => {
                operation.status = OperationStatus::Failed;
                operation.error = Some(message);
            }
            None => operation.status = OperationStatus::TimedOut,
        }
        self.ledger.record(operation.clone());

        match operation.status {
            OperationStatus::Success => Ok(operation),
            OperationStatus::Failed => {
                if self.settings.release_on_failed_operation {
                    self.throttle.release(&claim.requester);
                }
                Err(FaucetError::OperationFailed {
                    operation_id,
                    cause: operation.error.unwrap_or_default(),
                })
            }
            OperationStatus::TimedOut | OperationStatus::Pending => {
                tracing::warn!(operation_id = %operation_id, attempts, "Operation did not resolve in time");
                Err(FaucetError::OperationTimedOut { operation_id })
            }
        }
    }

    fn admit(&self) -> FaucetResult<Option<OwnedSemaphorePermit>> {
        match &self.permits {
            Some(permits) => permits
                .clone()
                .try_acquire_owned()
                .map(Some)
                .map_err(|_| FaucetError::Overloaded),
            None => Ok(None),
        }
    }

    /// Poll the backend until the operation resolves or the ceiling is hit.
    ///
    /// Returns the resolution, if any, and the number of polls made.
    async fn poll_until_resolved(&self, operation_id: &str) -> (Option<Resolution>, u32) {
        let ids = [operation_id.to_string()];

        for attempt in 1..=self.settings.poll_attempts {
            sleep(self.settings.poll_interval).await;

            match self.backend.operation_results(&ids).await {
                Ok(results) => {
                    let resolution = results
                        .iter()
                        .find(|r| r.id == operation_id)
                        .and_then(|r| r.resolution());
                    if let Some(resolution) = resolution {
                        tracing::debug!(operation_id, attempt, ?resolution, "Operation resolved");
                        return (Some(resolution), attempt);
                    }
                }
                Err(e) => {
                    tracing::warn!(operation_id, attempt, error = %e, "Operation poll failed");
                }
            }
        }

        (None, self.settings.poll_attempts)
    }
}
