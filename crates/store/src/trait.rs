use std::sync::Arc;

use thiserror::Error;

use millstock_core::{ComponentId, PendingIssuanceId, TransactionId};
use millstock_ledger::{InventorySnapshot, InventoryTransaction, TransactionDraft};
use millstock_picking::PendingIssuance;

/// Storage-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No snapshot exists for the component and the draft required one.
    /// Distinguished so callers can initialize tracking and retry instead of
    /// treating it as a generic failure.
    #[error("no inventory snapshot exists for component {0}")]
    MissingSnapshot(ComponentId),

    /// The draft's delta resolved to zero under the component lock; nothing
    /// to record.
    #[error("mutation delta resolved to zero")]
    EmptyDelta,

    /// A uniqueness or state conflict (snapshot already initialized,
    /// terminal picking list, duplicate id).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist.
    #[error("not found")]
    NotFound,

    /// A stored value could not be decoded.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// Transport/backend failure. Absence of an explicit success from the
    /// backend always lands here, never on a success path.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Result of one committed mutation: the ledger entry as written and the
/// snapshot state it left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedMutation {
    pub transaction: InventoryTransaction,
    pub snapshot: InventorySnapshot,
}

/// The single write boundary over ledger, snapshot, and picking-list state.
///
/// Implementations must make [`commit`](StockStore::commit) atomic (ledger
/// insert and snapshot upsert succeed or fail together) and must serialize
/// concurrent commits per component, so read-modify-write on
/// `quantity_on_hand` cannot lose updates. Everything else is plain reads
/// and picking-list persistence.
pub trait StockStore: Send + Sync {
    /// Current snapshot for a component, if tracking was ever initialized.
    fn snapshot(&self, component_id: ComponentId) -> Result<Option<InventorySnapshot>, StoreError>;

    /// Initialize tracking for a component. Fails with `Conflict` when a
    /// snapshot already exists.
    fn create_snapshot(&self, snapshot: InventorySnapshot) -> Result<InventorySnapshot, StoreError>;

    /// Atomically append one ledger entry and update the paired snapshot.
    ///
    /// The draft's delta is resolved while holding the component lock
    /// (`SetTo` becomes `target - current` there), `balance_after` is
    /// computed from the locked quantity, and the snapshot policy decides
    /// whether a missing snapshot is created at zero or rejected as
    /// [`StoreError::MissingSnapshot`].
    fn commit(&self, draft: TransactionDraft) -> Result<CommittedMutation, StoreError>;

    /// Most recent `limit` transactions for a component, ordered by
    /// occurred_at descending with transaction id descending as tie-break.
    fn list_recent(
        &self,
        component_id: ComponentId,
        limit: usize,
    ) -> Result<Vec<InventoryTransaction>, StoreError>;

    /// Look up a single ledger entry by id.
    fn find_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<InventoryTransaction>, StoreError>;

    /// Persist a freshly created picking list. Fails with `Conflict` on a
    /// duplicate id.
    fn insert_pending(&self, list: &PendingIssuance) -> Result<(), StoreError>;

    /// Load a picking list by id.
    fn fetch_pending(
        &self,
        pending_id: PendingIssuanceId,
    ) -> Result<Option<PendingIssuance>, StoreError>;

    /// Persist picking-list progress (item transaction ids, status
    /// transitions). Fails with `NotFound` when the list does not exist and
    /// with `Conflict` when the stored list is already terminal.
    fn update_pending(&self, list: &PendingIssuance) -> Result<(), StoreError>;
}

impl<S: StockStore + ?Sized> StockStore for Arc<S> {
    fn snapshot(&self, component_id: ComponentId) -> Result<Option<InventorySnapshot>, StoreError> {
        (**self).snapshot(component_id)
    }

    fn create_snapshot(&self, snapshot: InventorySnapshot) -> Result<InventorySnapshot, StoreError> {
        (**self).create_snapshot(snapshot)
    }

    fn commit(&self, draft: TransactionDraft) -> Result<CommittedMutation, StoreError> {
        (**self).commit(draft)
    }

    fn list_recent(
        &self,
        component_id: ComponentId,
        limit: usize,
    ) -> Result<Vec<InventoryTransaction>, StoreError> {
        (**self).list_recent(component_id, limit)
    }

    fn find_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<InventoryTransaction>, StoreError> {
        (**self).find_transaction(transaction_id)
    }

    fn insert_pending(&self, list: &PendingIssuance) -> Result<(), StoreError> {
        (**self).insert_pending(list)
    }

    fn fetch_pending(
        &self,
        pending_id: PendingIssuanceId,
    ) -> Result<Option<PendingIssuance>, StoreError> {
        (**self).fetch_pending(pending_id)
    }

    fn update_pending(&self, list: &PendingIssuance) -> Result<(), StoreError> {
        (**self).update_pending(list)
    }
}
