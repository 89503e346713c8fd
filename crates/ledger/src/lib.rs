//! Ledger domain module.
//!
//! Immutable transaction records, the per-component quantity snapshot, and
//! the pure quantity math (adjustment deltas, reversal deltas, running
//! balance reconstruction). No IO, no storage.

pub mod adjust;
pub mod balance;
pub mod snapshot;
pub mod transaction;

pub use adjust::{AdjustMode, adjustment_delta, reversal_delta, reversal_kind};
pub use balance::{first_divergence, running_balances};
pub use snapshot::InventorySnapshot;
pub use transaction::{
    InventoryTransaction, MutationDelta, SnapshotPolicy, TransactionDraft, TransactionKind,
};
