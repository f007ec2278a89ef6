//! Faucet data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a claimed destination address, derived from its text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Unknown,
    TransparentTestnet,
    ShieldedTestnetSapling,
}

/// One incoming claim. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    /// Opaque requester identity, usually the peer IP.
    pub requester: String,
    /// Destination address with surrounding whitespace removed.
    pub address: String,
    pub submitted_at: DateTime<Utc>,
}

impl ClaimRequest {
    pub fn new(requester: impl Into<String>, address: &str, submitted_at: DateTime<Utc>) -> Self {
        Self {
            requester: requester.into(),
            address: address.trim().to_string(),
            submitted_at,
        }
    }
}

/// Cool-down record for one requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThrottleEntry {
    pub requester: String,
    pub last_granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ThrottleEntry {
    /// Whether the entry still blocks its requester at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Lifecycle of a backend send operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    Success,
    Failed,
    TimedOut,
}

/// A disbursement accepted by the backend, tracked by operation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisbursementOperation {
    pub operation_id: String,
    pub requester: String,
    pub address: String,
    pub amount: f64,
    pub status: OperationStatus,
    pub transaction_id: Option<String>,
    /// Backend-reported failure message.
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl DisbursementOperation {
    pub fn pending(
        operation_id: String,
        claim: &ClaimRequest,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            operation_id,
            requester: claim.requester.clone(),
            address: claim.address.clone(),
            amount,
            status: OperationStatus::Pending,
            transaction_id: None,
            error: None,
            updated_at: now,
        }
    }
}

/// Latest known chain status, shown on the home page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub height: u64,
    pub network_name: String,
    pub daemon_version: String,
    /// `None` until the first successful refresh.
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// A wallet address together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownAddress {
    pub address: String,
    pub kind: AddressKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claim_trims_address() {
        let claim = ClaimRequest::new("10.0.0.1", "  tmAAA \n", Utc::now());
        assert_eq!(claim.address, "tmAAA");
    }

    #[test]
    fn test_throttle_entry_liveness() {
        let now = Utc::now();
        let entry = ThrottleEntry {
            requester: "r".into(),
            last_granted_at: now,
            expires_at: now + Duration::seconds(120),
        };
        assert!(entry.is_live(now));
        assert!(entry.is_live(now + Duration::seconds(119)));
        assert!(!entry.is_live(now + Duration::seconds(120)));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&OperationStatus::TimedOut).unwrap();
        assert_eq!(json, "\"timed_out\"");
        let json = serde_json::to_string(&AddressKind::ShieldedTestnetSapling).unwrap();
        assert_eq!(json, "\"shielded_testnet_sapling\"");
    }
}
