//! HTTP front end subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, requester identity)
//!     → handlers.rs (home/claim, balance, ops status, addresses)
//!     → faucet::Coordinator
//!     → response.rs (FaucetError → status + JSON)
//! ```
//!
//! Rendering is left to clients; every entry point answers with JSON.

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{requester_identity, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, FaucetServer};
