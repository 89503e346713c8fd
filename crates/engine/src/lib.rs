//! Mutation engine and picking-list orchestration.
//!
//! The only code paths that mutate ledger + snapshot state. The engine
//! validates, builds a transaction draft, and performs exactly one atomic
//! store commit per operation; the picking service stages multi-component
//! withdrawals and drives the engine once per item at completion time.

pub mod error;
pub mod mutation;
pub mod picking;

#[cfg(test)]
mod integration_tests;

pub use error::{BatchFailure, EngineError, FailedItem, IssuedItem};
pub use mutation::{AdjustStock, IssueRequest, MutationEngine, RecentActivity, ReverseTransaction};
pub use picking::{CreatePickingList, PickingService};
