//! Shared utilities for integration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use testnet_faucet::config::FaucetConfig;
use testnet_faucet::rpc::{
    BlockchainInfo, DaemonInfo, GroupingNode, OperationResult, Recipient, RpcBackend, RpcError,
    RpcResult, TotalBalance,
};

/// How submitted operations eventually resolve.
#[allow(dead_code)]
#[derive(Clone)]
pub enum Outcome {
    Succeed { txid: String },
    Fail { message: String },
    Never,
}

/// Scriptable stand-in for the wallet daemon that counts every call.
pub struct MockBackend {
    outcome: Outcome,
    resolve_after: u32,
    submit_error: Option<RpcError>,
    submit_delay: Duration,
    polls: Mutex<HashMap<String, u32>>,
    recipients: Mutex<Vec<Recipient>>,
    pub submit_calls: AtomicU32,
    pub poll_calls: AtomicU32,
    pub read_calls: AtomicU32,
}

#[allow(dead_code)]
impl MockBackend {
    /// Submissions succeed; operations resolve as success on the first poll.
    pub fn new() -> Self {
        Self {
            outcome: Outcome::Succeed { txid: "tx-123".into() },
            resolve_after: 1,
            submit_error: None,
            submit_delay: Duration::ZERO,
            polls: Mutex::new(HashMap::new()),
            recipients: Mutex::new(Vec::new()),
            submit_calls: AtomicU32::new(0),
            poll_calls: AtomicU32::new(0),
            read_calls: AtomicU32::new(0),
        }
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Report the resolution on the `polls`-th poll of an operation.
    pub fn resolve_after(mut self, polls: u32) -> Self {
        self.resolve_after = polls;
        self
    }

    pub fn failing_submission(mut self, err: RpcError) -> Self {
        self.submit_error = Some(err);
        self
    }

    pub fn submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn total_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
            + self.poll_calls.load(Ordering::SeqCst)
            + self.read_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<Recipient> {
        self.recipients.lock().unwrap().clone()
    }
}

#[async_trait]
impl RpcBackend for MockBackend {
    async fn blockchain_info(&self) -> RpcResult<BlockchainInfo> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        Ok(BlockchainInfo {
            chain: "test".into(),
            blocks: 2_500_000,
            ..Default::default()
        })
    }

    async fn daemon_info(&self) -> RpcResult<DaemonInfo> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        Ok(DaemonInfo { version: 5040050, build: Some("v5.4.0".into()) })
    }

    async fn list_shielded_addresses(&self) -> RpcResult<Vec<String>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["ztestsapling1funding".into()])
    }

    async fn list_address_groupings(&self) -> RpcResult<Vec<GroupingNode>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        serde_json::from_str(r#"[[["tmFunding", 12.5, "faucet"], ["t1Mainnet", 0.0]]]"#)
            .map_err(|e| RpcError::Decode(e.to_string()))
    }

    async fn total_balance(&self) -> RpcResult<TotalBalance> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TotalBalance {
            transparent: "12.50".into(),
            private: "30.00".into(),
            total: "42.50".into(),
        })
    }

    async fn send_many(&self, _from: &str, recipients: &[Recipient]) -> RpcResult<String> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        if let Some(err) = &self.submit_error {
            return Err(err.clone());
        }
        self.recipients.lock().unwrap().extend_from_slice(recipients);
        Ok(format!("op-{}", n))
    }

    async fn operation_results(&self, ids: &[String]) -> RpcResult<Vec<OperationResult>> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let mut polls = self.polls.lock().unwrap();
        let mut results = Vec::new();

        for id in ids {
            let count = polls.entry(id.clone()).or_insert(0);
            *count += 1;
            if *count < self.resolve_after {
                continue;
            }
            let record = match &self.outcome {
                Outcome::Succeed { txid } => serde_json::json!({
                    "id": id,
                    "status": "success",
                    "creation_time": 1_700_000_000,
                    "method": "z_sendmany",
                    "result": {"txid": txid},
                }),
                Outcome::Fail { message } => serde_json::json!({
                    "id": id,
                    "status": "failed",
                    "creation_time": 1_700_000_000,
                    "method": "z_sendmany",
                    "error": {"code": -6, "message": message},
                }),
                Outcome::Never => continue,
            };
            results.push(
                serde_json::from_value(record).map_err(|e| RpcError::Decode(e.to_string()))?,
            );
        }
        Ok(results)
    }
}

/// Valid configuration with fast polling.
#[allow(dead_code)]
pub fn test_config() -> FaucetConfig {
    let mut config = FaucetConfig::default();
    config.faucet.funding_address = "ztestsapling1funding".into();
    config.faucet.amount = 1.0;
    config.faucet.poll_interval_ms = 1000;
    config.faucet.poll_attempts = 120;
    config.throttle.cooldown_secs = 120;
    config
}
