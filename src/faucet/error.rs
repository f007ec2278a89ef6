//! Faucet failure taxonomy.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::rpc::RpcError;

/// Why a claimed address was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressRejection {
    #[error("address required")]
    Empty,

    #[error("unsupported or invalid address")]
    Unsupported,
}

/// Errors surfaced to callers of the faucet.
///
/// None of these are retried by the faucet itself.
#[derive(Debug, Error)]
pub enum FaucetError {
    /// The destination address failed validation. No side effects.
    #[error("{0}")]
    InvalidAddress(#[from] AddressRejection),

    /// The requester is inside its cool-down window.
    /// `retry_after_secs` is measured against the faucet clock.
    #[error("already claimed, try again after {retry_not_before}")]
    Throttled {
        retry_not_before: DateTime<Utc>,
        retry_after_secs: u64,
    },

    /// Too many disbursements are in flight.
    #[error("faucet is busy, try again shortly")]
    Overloaded,

    /// The backend refused the send; the reservation was rolled back.
    #[error("disbursement submission failed: {0}")]
    SubmissionFailed(#[source] RpcError),

    /// The backend accepted the send and later reported failure.
    #[error("disbursement {operation_id} failed: {cause}")]
    OperationFailed { operation_id: String, cause: String },

    /// The backend never resolved the send within the poll ceiling.
    #[error("disbursement {operation_id} did not complete in time")]
    OperationTimedOut { operation_id: String },

    #[error("operation {0} not found")]
    NotFound(String),

    /// A read-only backend query failed.
    #[error("wallet backend error: {0}")]
    Backend(#[source] RpcError),

    /// The disbursement task ended without producing a result.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FaucetError {
    /// Short label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            FaucetError::InvalidAddress(_) => "invalid_address",
            FaucetError::Throttled { .. } => "throttled",
            FaucetError::Overloaded => "overloaded",
            FaucetError::SubmissionFailed(_) => "submission_failed",
            FaucetError::OperationFailed { .. } => "operation_failed",
            FaucetError::OperationTimedOut { .. } => "timed_out",
            FaucetError::NotFound(_) => "not_found",
            FaucetError::Backend(_) => "backend_error",
            FaucetError::Internal(_) => "internal",
        }
    }
}

/// Result type for faucet operations.
pub type FaucetResult<T> = Result<T, FaucetError>;
