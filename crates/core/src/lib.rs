//! `millstock-core` — shared foundation for the stock ledger.
//!
//! Strongly-typed identifiers and the domain error model. This crate contains
//! **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{
    ComponentId, PendingIssuanceId, ProductId, PurchaseOrderId, SalesOrderId, StaffId,
    TransactionId, UserId,
};
