//! Testnet Faucet Library

pub mod clock;
pub mod config;
pub mod faucet;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rpc;

pub use config::FaucetConfig;
pub use faucet::Coordinator;
pub use http::FaucetServer;
pub use lifecycle::Shutdown;
