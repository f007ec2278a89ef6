//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger()
//!
//! Shutdown (shutdown.rs):
//!     trigger → HTTP server drains → background tasks exit at next cycle
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
