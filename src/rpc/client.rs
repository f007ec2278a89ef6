//! Wallet daemon JSON-RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - POST JSON-RPC envelopes to the daemon with basic auth
//! - Enforce a per-call deadline
//! - Decode `result` into typed values, surface `error` objects

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::timeout;

use crate::observability::metrics;
use crate::rpc::types::{
    BlockchainInfo, DaemonInfo, GroupingNode, OperationResult, Recipient, RpcConfig, RpcError,
    RpcResult, TotalBalance,
};
use crate::rpc::RpcBackend;

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// JSON-RPC client for a zcashd-compatible wallet daemon.
pub struct JsonRpcClient {
    http: reqwest::Client,
    endpoint: String,
    user: String,
    password: String,
    timeout_duration: Duration,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Create a new client from configuration.
    ///
    /// No connection is made until the first call.
    pub fn new(config: &RpcConfig) -> RpcResult<Self> {
        let endpoint = config.endpoint();
        url::Url::parse(&endpoint)
            .map_err(|e| RpcError::Transport(format!("Invalid RPC URL '{}': {}", endpoint, e)))?;

        // The daemon is addressed directly, never through an HTTP proxy.
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        tracing::info!(endpoint = %endpoint, "Wallet RPC client initialized");

        Ok(Self {
            http,
            endpoint,
            user: config.user.clone(),
            password: config.password.clone(),
            timeout_duration: Duration::from_secs(config.timeout_secs),
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one call and decode its `result`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<T> {
        let result = self.call_raw(method, params).await;
        metrics::record_rpc_call(method, result.is_ok());
        let value = result?;
        serde_json::from_value(value)
            .map_err(|e| RpcError::Decode(format!("{}: {}", method, e)))
    }

    async fn call_raw(&self, method: &str, params: Value) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "1.0",
            "id": id,
            "method": method,
            "params": params,
        });

        // The deadline covers the body as well as the headers; a daemon
        // that stalls mid-response must not hang the caller.
        let exchange = async {
            let response = self
                .http
                .post(&self.endpoint)
                .basic_auth(&self.user, Some(&self.password))
                .json(&payload)
                .send()
                .await
                .map_err(|e| RpcError::Transport(e.to_string()))?;

            // zcashd reports RPC errors with a 500 status and a JSON body,
            // so the body is decoded before the status is looked at.
            let status = response.status();
            response.json::<RpcEnvelope>().await.map_err(|e| {
                RpcError::Decode(format!("{} (HTTP {}): {}", method, status, e))
            })
        };

        let envelope = match timeout(self.timeout_duration, exchange).await {
            Ok(result) => result?,
            Err(_) => return Err(RpcError::Timeout(self.timeout_duration.as_secs())),
        };

        if let Some(err) = envelope.error {
            return Err(RpcError::Server {
                code: err.code,
                message: err.message,
            });
        }

        match envelope.result {
            Some(value) => Ok(value),
            None => Err(RpcError::EmptyResult(method.to_string())),
        }
    }
}

#[async_trait]
impl RpcBackend for JsonRpcClient {
    async fn blockchain_info(&self) -> RpcResult<BlockchainInfo> {
        self.call("getblockchaininfo", json!([])).await
    }

    async fn daemon_info(&self) -> RpcResult<DaemonInfo> {
        self.call("getinfo", json!([])).await
    }

    async fn list_shielded_addresses(&self) -> RpcResult<Vec<String>> {
        self.call("z_listaddresses", json!([])).await
    }

    async fn list_address_groupings(&self) -> RpcResult<Vec<GroupingNode>> {
        self.call("listaddressgroupings", json!([])).await
    }

    async fn total_balance(&self) -> RpcResult<TotalBalance> {
        self.call("z_gettotalbalance", json!([])).await
    }

    async fn send_many(&self, from: &str, recipients: &[Recipient]) -> RpcResult<String> {
        self.call("z_sendmany", json!([from, recipients])).await
    }

    async fn operation_results(&self, ids: &[String]) -> RpcResult<Vec<OperationResult>> {
        self.call("z_getoperationresult", json!([ids])).await
    }
}

impl std::fmt::Debug for JsonRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcClient")
            .field("endpoint", &self.endpoint)
            .field("user", &self.user)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
