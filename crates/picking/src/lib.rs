//! Picking list domain module.
//!
//! A pending issuance stages a multi-component withdrawal before it touches
//! the ledger. Pure state-machine logic only; the engine crate drives actual
//! issuance at completion time.

pub mod pending;

pub use pending::{PendingIssuance, PendingItem, PendingStatus};
