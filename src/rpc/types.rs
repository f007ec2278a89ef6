//! Typed wallet RPC results and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export RpcConfig from config module to avoid duplication
pub use crate::config::schema::RpcConfig;

/// Errors that can occur while talking to the wallet daemon.
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    /// Connection or HTTP-level failure.
    #[error("RPC transport error: {0}")]
    Transport(String),

    /// The daemon did not answer in time.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The daemon answered with a JSON-RPC error object.
    #[error("RPC server error {code}: {message}")]
    Server { code: i64, message: String },

    /// The response did not have the expected shape.
    #[error("RPC decode error: {0}")]
    Decode(String),

    /// The daemon returned neither a result nor an error.
    #[error("RPC call '{0}' returned an empty result")]
    EmptyResult(String),
}

/// Result type for wallet RPC calls.
pub type RpcResult<T> = Result<T, RpcError>;

/// `getblockchaininfo` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockchainInfo {
    /// Network name (`main`, `test`, `regtest`).
    pub chain: String,
    /// Current block height.
    pub blocks: u64,
    #[serde(default)]
    pub headers: u64,
    #[serde(default, rename = "bestblockhash")]
    pub best_block_hash: String,
    #[serde(default)]
    pub difficulty: f64,
    #[serde(default, rename = "verificationprogress")]
    pub verification_progress: f64,
    #[serde(default)]
    pub size_on_disk: f64,
    #[serde(default, rename = "softforks")]
    pub soft_forks: Vec<SoftFork>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftFork {
    pub id: String,
    pub version: i64,
}

/// `getinfo` response. Only the version fields are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaemonInfo {
    /// Numeric daemon version, e.g. `5040050`.
    pub version: u64,
    /// Human readable build string, e.g. `v5.4.0`.
    #[serde(default)]
    pub build: Option<String>,
}

impl DaemonInfo {
    /// Display form of the daemon version.
    pub fn version_string(&self) -> String {
        match &self.build {
            Some(build) if !build.is_empty() => build.clone(),
            _ => self.version.to_string(),
        }
    }
}

/// `z_gettotalbalance` response. Amounts are decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalBalance {
    pub transparent: String,
    pub private: String,
    pub total: String,
}

/// One `{address, amount}` entry of a `z_sendmany` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub address: String,
    pub amount: f64,
}

/// One record of a `z_getoperationresult` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub id: String,
    /// `queued`, `executing`, `success`, `failed` or `cancelled`.
    pub status: String,
    #[serde(default)]
    pub creation_time: i64,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub result: Option<OperationTxResult>,
    #[serde(default)]
    pub error: Option<OperationErrorInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationTxResult {
    pub txid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationErrorInfo {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Final outcome of a backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Success { txid: Option<String> },
    Failed { message: String },
}

impl OperationResult {
    /// `None` while the operation is still queued or executing.
    pub fn resolution(&self) -> Option<Resolution> {
        match self.status.as_str() {
            "success" => Some(Resolution::Success {
                txid: self.result.as_ref().map(|r| r.txid.clone()),
            }),
            "failed" | "cancelled" => Some(Resolution::Failed {
                message: self
                    .error
                    .as_ref()
                    .map(|e| e.message.clone())
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("operation {}", self.status)),
            }),
            _ => None,
        }
    }
}

/// A node of the nested `listaddressgroupings` response.
///
/// The daemon answers with groups of `[address, amount, account?]` arrays
/// nested inside arrays, so the shape is decoded as a small recursive tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupingNode {
    Address(String),
    Amount(f64),
    List(Vec<GroupingNode>),
}

impl GroupingNode {
    fn collect_into(&self, out: &mut Vec<String>) {
        match self {
            GroupingNode::Address(addr) => out.push(addr.clone()),
            GroupingNode::Amount(_) => {}
            GroupingNode::List(children) => match children.first() {
                // A leaf entry: only the first element is the address,
                // a trailing string is an account label.
                Some(GroupingNode::Address(addr)) => out.push(addr.clone()),
                _ => children.iter().for_each(|c| c.collect_into(out)),
            },
        }
    }
}

/// Flatten a grouping tree into the addresses it contains, in order.
pub fn collect_addresses(nodes: &[GroupingNode]) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        node.collect_into(&mut out);
    }
    out
}
