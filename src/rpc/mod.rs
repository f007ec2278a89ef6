//! Wallet daemon RPC subsystem.
//!
//! # Data Flow
//! ```text
//! FaucetConfig.rpc (host, port, credentials)
//!     → client.rs (JSON-RPC over HTTP with timeouts)
//!     → types.rs (typed results, decoded at the boundary)
//!     → RpcBackend trait consumed by the faucet subsystem
//! ```
//!
//! # Security Constraints
//! - Credentials are attached to every call by the client, never by callers
//! - Never log RPC credentials

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::JsonRpcClient;
pub use types::{
    collect_addresses, BlockchainInfo, DaemonInfo, GroupingNode, OperationResult, Recipient,
    Resolution, RpcConfig, RpcError, RpcResult, TotalBalance,
};

/// Request/response calls the faucet makes against the wallet daemon.
#[async_trait]
pub trait RpcBackend: Send + Sync {
    /// `getblockchaininfo`
    async fn blockchain_info(&self) -> RpcResult<BlockchainInfo>;

    /// `getinfo`
    async fn daemon_info(&self) -> RpcResult<DaemonInfo>;

    /// `z_listaddresses`
    async fn list_shielded_addresses(&self) -> RpcResult<Vec<String>>;

    /// `listaddressgroupings`
    async fn list_address_groupings(&self) -> RpcResult<Vec<GroupingNode>>;

    /// `z_gettotalbalance`
    async fn total_balance(&self) -> RpcResult<TotalBalance>;

    /// `z_sendmany`. Returns the backend-assigned operation id.
    async fn send_many(&self, from: &str, recipients: &[Recipient]) -> RpcResult<String>;

    /// `z_getoperationresult`. Only finished operations are reported.
    async fn operation_results(&self, ids: &[String]) -> RpcResult<Vec<OperationResult>>;
}
