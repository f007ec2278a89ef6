//! Disbursement subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP claim (requester, address)
//!     → coordinator.rs (facade)
//!     → dispenser.rs
//!         → address.rs (prefix classification)
//!         → throttle.rs (reserve before any backend call)
//!         → RpcBackend z_sendmany, then z_getoperationresult polling
//!         → ledger.rs (record final operation)
//!
//! Background:
//!     throttle.rs sweeper (expired entries)
//!     chain_info.rs refresher (height, network, daemon version)
//! ```
//!
//! # Design Decisions
//! - The throttle cache is the only authority on "may claim now"
//! - Shared maps stay private to their owning structs
//! - Chain info is read as whole snapshots, never partially updated

pub mod address;
pub mod chain_info;
pub mod coordinator;
pub mod dispenser;
pub mod error;
pub mod ledger;
pub mod throttle;
pub mod types;

pub use address::{classify, validate_claim_address};
pub use chain_info::{ChainInfoHandle, ChainInfoRefresher};
pub use coordinator::Coordinator;
pub use dispenser::{Dispenser, DispenserSettings};
pub use error::{AddressRejection, FaucetError, FaucetResult};
pub use ledger::OperationLedger;
pub use throttle::{Reservation, ThrottleCache};
pub use types::{
    AddressKind, ChainInfo, ClaimRequest, DisbursementOperation, KnownAddress, OperationStatus,
    ThrottleEntry,
};
