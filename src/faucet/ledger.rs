//! In-memory ledger of disbursement operations keyed by operation id.
//!
//! Entries are never evicted; the faucet is a low-volume tool and the
//! ledger lives as long as the process.

use dashmap::DashMap;

use crate::faucet::types::DisbursementOperation;

#[derive(Default)]
pub struct OperationLedger {
    operations: DashMap<String, DisbursementOperation>,
}

impl OperationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record for `operation.operation_id`.
    pub fn record(&self, operation: DisbursementOperation) {
        self.operations.insert(operation.operation_id.clone(), operation);
    }

    pub fn get(&self, operation_id: &str) -> Option<DisbursementOperation> {
        self.operations.get(operation_id).map(|r| r.value().clone())
    }

    /// All operations, most recently updated first.
    pub fn list(&self) -> Vec<DisbursementOperation> {
        let mut all: Vec<_> = self.operations.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        all
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faucet::types::{ClaimRequest, OperationStatus};
    use chrono::{Duration, Utc};

    #[test]
    fn test_record_and_overwrite() {
        let ledger = OperationLedger::new();
        let now = Utc::now();
        let claim = ClaimRequest::new("r1", "tmAAA", now);

        let mut op = DisbursementOperation::pending("op-1".into(), &claim, 1.0, now);
        ledger.record(op.clone());
        assert_eq!(ledger.get("op-1").unwrap().status, OperationStatus::Pending);

        op.status = OperationStatus::Success;
        op.transaction_id = Some("tx-123".into());
        ledger.record(op);

        let stored = ledger.get("op-1").unwrap();
        assert_eq!(stored.status, OperationStatus::Success);
        assert_eq!(stored.transaction_id.as_deref(), Some("tx-123"));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.get("op-2").is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let ledger = OperationLedger::new();
        let now = Utc::now();
        let claim = ClaimRequest::new("r1", "tmAAA", now);

        ledger.record(DisbursementOperation::pending("old".into(), &claim, 1.0, now));
        ledger.record(DisbursementOperation::pending(
            "new".into(),
            &claim,
            1.0,
            now + Duration::seconds(5),
        ));

        let ids: Vec<_> = ledger.list().into_iter().map(|o| o.operation_id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }
}
