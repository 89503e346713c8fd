use std::collections::HashMap;
use std::sync::RwLock;

use millstock_core::{ComponentId, PendingIssuanceId, TransactionId};
use millstock_ledger::{
    InventorySnapshot, InventoryTransaction, MutationDelta, SnapshotPolicy, TransactionDraft,
};
use millstock_picking::PendingIssuance;

use super::r#trait::{CommittedMutation, StockStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    snapshots: HashMap<ComponentId, InventorySnapshot>,
    ledger: Vec<InventoryTransaction>,
    pendings: HashMap<PendingIssuanceId, PendingIssuance>,
}

/// In-memory stock store.
///
/// Intended for tests/dev. Commits take the write lock, which serializes all
/// read-modify-write on snapshots (a coarser guarantee than the
/// per-component row lock the Postgres store uses, but a correct one).
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    inner: RwLock<Inner>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl StockStore for InMemoryStockStore {
    fn snapshot(&self, component_id: ComponentId) -> Result<Option<InventorySnapshot>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.snapshots.get(&component_id).cloned())
    }

    fn create_snapshot(&self, snapshot: InventorySnapshot) -> Result<InventorySnapshot, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.snapshots.contains_key(&snapshot.component_id) {
            return Err(StoreError::Conflict(format!(
                "snapshot already exists for component {}",
                snapshot.component_id
            )));
        }
        inner.snapshots.insert(snapshot.component_id, snapshot.clone());
        Ok(snapshot)
    }

    fn commit(&self, draft: TransactionDraft) -> Result<CommittedMutation, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let current = match inner.snapshots.get(&draft.component_id) {
            Some(snapshot) => snapshot.quantity_on_hand,
            None => match draft.snapshot_policy {
                SnapshotPolicy::Require => {
                    return Err(StoreError::MissingSnapshot(draft.component_id));
                }
                SnapshotPolicy::CreateIfMissing => {
                    let zero = InventorySnapshot::zero(draft.component_id);
                    inner.snapshots.insert(draft.component_id, zero);
                    0
                }
            },
        };

        // Delta resolution happens under the write lock; `SetTo` is exact
        // even when another commit raced us to this point.
        let delta = match draft.delta {
            MutationDelta::Apply(delta) => delta,
            MutationDelta::SetTo(target) => target - current,
        };
        if delta == 0 {
            return Err(StoreError::EmptyDelta);
        }

        let balance_after = current + delta;
        let transaction = draft.into_transaction(delta, balance_after);
        let component_id = transaction.component_id;

        inner.ledger.push(transaction.clone());
        let snapshot = inner
            .snapshots
            .get_mut(&component_id)
            .ok_or_else(|| StoreError::Backend("snapshot vanished during commit".to_string()))?;
        snapshot.quantity_on_hand = balance_after;
        let snapshot = snapshot.clone();

        Ok(CommittedMutation {
            transaction,
            snapshot,
        })
    }

    fn list_recent(
        &self,
        component_id: ComponentId,
        limit: usize,
    ) -> Result<Vec<InventoryTransaction>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut matching: Vec<_> = inner
            .ledger
            .iter()
            .filter(|tx| tx.component_id == component_id)
            .cloned()
            .collect();
        // Most recent first; UUIDv7 ids break occurred_at ties.
        matching.sort_by(|a, b| {
            b.occurred_at
                .cmp(&a.occurred_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        matching.truncate(limit);
        Ok(matching)
    }

    fn find_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<InventoryTransaction>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .ledger
            .iter()
            .find(|tx| tx.id == transaction_id)
            .cloned())
    }

    fn insert_pending(&self, list: &PendingIssuance) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.pendings.contains_key(&list.id()) {
            return Err(StoreError::Conflict(format!(
                "picking list {} already exists",
                list.id()
            )));
        }
        inner.pendings.insert(list.id(), list.clone());
        Ok(())
    }

    fn fetch_pending(
        &self,
        pending_id: PendingIssuanceId,
    ) -> Result<Option<PendingIssuance>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.pendings.get(&pending_id).cloned())
    }

    fn update_pending(&self, list: &PendingIssuance) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let stored = inner
            .pendings
            .get_mut(&list.id())
            .ok_or(StoreError::NotFound)?;
        // Terminal rows are immutable at the storage level too.
        if stored.status().is_terminal() {
            return Err(StoreError::Conflict(format!(
                "picking list {} is terminal",
                list.id()
            )));
        }
        *stored = list.clone();
        Ok(())
    }
}
