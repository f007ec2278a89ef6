//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the faucet.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the faucet service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FaucetConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Wallet daemon connection.
    pub rpc: RpcConfig,

    /// Disbursement settings.
    pub faucet: DisbursementConfig,

    /// Per-requester cool-down.
    pub throttle: ThrottleConfig,

    /// Background chain status refresh.
    pub chain_info: ChainInfoConfig,

    /// HTTP front end settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Wallet daemon RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,

    /// RPC request timeout in seconds.
    pub timeout_secs: u64,
}

impl RpcConfig {
    /// HTTP endpoint of the daemon.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 18232, // zcashd testnet RPC port
            user: String::new(),
            password: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Disbursement configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisbursementConfig {
    /// Wallet address funds are sent from. Required.
    pub funding_address: String,

    /// Amount sent per claim.
    pub amount: f64,

    /// Delay between operation result polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum number of polls before an operation is declared timed out.
    pub poll_attempts: u32,

    /// Maximum concurrent in-flight disbursements (0 = unbounded).
    pub max_in_flight: usize,
}

impl Default for DisbursementConfig {
    fn default() -> Self {
        Self {
            funding_address: String::new(),
            amount: 1.0,
            poll_interval_ms: 1000,
            poll_attempts: 120,
            max_in_flight: 64,
        }
    }
}

/// Per-requester throttle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Cool-down window in seconds.
    pub cooldown_secs: u64,

    /// Interval between expired-entry sweeps in seconds.
    pub sweep_interval_secs: u64,

    /// Release the reservation when the backend reports the operation failed.
    /// Timed out operations always keep their reservation.
    pub release_on_failed_operation: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 120,
            sweep_interval_secs: 30,
            release_on_failed_operation: false,
        }
    }
}

/// Chain info refresh configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainInfoConfig {
    /// Refresh period in seconds.
    pub refresh_secs: u64,
}

impl Default for ChainInfoConfig {
    fn default() -> Self {
        Self { refresh_secs: 30 }
    }
}

/// HTTP front end configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds. Must cover the full poll ceiling.
    pub request_timeout_secs: u64,

    /// Use the first `X-Forwarded-For` entry as requester identity.
    pub trust_forwarded_for: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 150,
            trust_forwarded_for: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
