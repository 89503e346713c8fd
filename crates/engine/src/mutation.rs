//! The mutation engine: the sole writer of ledger + snapshot state.
//!
//! Every operation follows the same shape: validate → build a
//! [`TransactionDraft`] → one atomic store commit. No operation writes more
//! than one ledger entry, and no partial state is observable when a commit
//! fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use millstock_core::{ComponentId, StaffId, TransactionId, UserId};
use millstock_ledger::{
    AdjustMode, InventorySnapshot, InventoryTransaction, MutationDelta, SnapshotPolicy,
    TransactionDraft, TransactionKind, adjustment_delta, first_divergence, reversal_delta,
    reversal_kind, running_balances,
};
use millstock_store::{CommittedMutation, StockStore, StoreError};

use crate::error::{BatchFailure, EngineError, FailedItem, IssuedItem};

/// Request: adjust a component's quantity-on-hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub component_id: ComponentId,
    pub mode: AdjustMode,
    pub magnitude: i64,
    pub reason_code: String,
    pub notes: Option<String>,
    pub acting_user_id: Option<UserId>,
}

/// Request: manually issue stock out of inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    pub component_id: ComponentId,
    /// Units to withdraw; must be positive. The ledger entry records the
    /// negated value.
    pub quantity: i64,
    pub issue_category: Option<String>,
    pub external_reference: String,
    pub staff_id: Option<StaffId>,
    pub notes: Option<String>,
    /// Issue date; defaults to now.
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Request: reverse all or part of a prior ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseTransaction {
    pub transaction_id: TransactionId,
    pub quantity_to_reverse: i64,
    pub reason: String,
    pub acting_user_id: Option<UserId>,
}

/// Read result: snapshot, recent ledger window, and the derived running
/// balances for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentActivity {
    pub snapshot: InventorySnapshot,
    /// Most recent first.
    pub transactions: Vec<InventoryTransaction>,
    /// `derived_balances[i]` is the reconstructed balance right after
    /// `transactions[i]`; authoritative values are on the rows themselves.
    pub derived_balances: Vec<i64>,
}

/// The only writable surface over stock state.
#[derive(Debug)]
pub struct MutationEngine<S: StockStore> {
    store: S,
}

impl<S: StockStore> MutationEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adjust quantity-on-hand by mode + magnitude.
    ///
    /// `set` resolves against the locked current quantity inside the store;
    /// a delta of zero (including setting to the current value) is a
    /// validation error. The snapshot is created lazily at zero when the
    /// component was never tracked.
    #[instrument(skip(self, request), fields(component_id = %request.component_id), err)]
    pub fn adjust(&self, request: AdjustStock) -> Result<CommittedMutation, EngineError> {
        if request.reason_code.trim().is_empty() {
            return Err(EngineError::Validation(
                "adjustment reason code is required".to_string(),
            ));
        }
        let delta = match request.mode {
            AdjustMode::Set => MutationDelta::SetTo(request.magnitude),
            AdjustMode::Add | AdjustMode::Subtract => {
                if request.magnitude <= 0 {
                    return Err(EngineError::Validation(
                        "adjustment magnitude must be positive".to_string(),
                    ));
                }
                MutationDelta::Apply(adjustment_delta(request.mode, request.magnitude, 0))
            }
        };

        let mut draft = TransactionDraft::new(
            request.component_id,
            TransactionKind::Adjustment,
            delta,
            SnapshotPolicy::CreateIfMissing,
        );
        draft.reason = Some(match &request.notes {
            Some(notes) if !notes.trim().is_empty() => {
                format!("{}: {}", request.reason_code, notes)
            }
            _ => request.reason_code.clone(),
        });
        draft.acting_user_id = request.acting_user_id;

        let committed = self.store.commit(draft)?;
        info!(
            component_id = %committed.transaction.component_id,
            delta = committed.transaction.quantity,
            balance = committed.snapshot.quantity_on_hand,
            "stock adjusted"
        );
        Ok(committed)
    }

    /// Issue stock out of inventory against an external reference.
    ///
    /// Issuing more than is on hand succeeds and drives the snapshot
    /// negative (back-ordered stock is a valid state). Issuing against an
    /// untracked component fails with [`EngineError::MissingInventory`]
    /// before anything is written.
    #[instrument(skip(self, request), fields(component_id = %request.component_id), err)]
    pub fn manual_issue(&self, request: IssueRequest) -> Result<CommittedMutation, EngineError> {
        if request.quantity <= 0 {
            return Err(EngineError::Validation(
                "issue quantity must be positive".to_string(),
            ));
        }
        if request.external_reference.trim().is_empty() {
            return Err(EngineError::Validation(
                "external reference is required".to_string(),
            ));
        }

        let mut draft = TransactionDraft::new(
            request.component_id,
            TransactionKind::Issue,
            MutationDelta::Apply(-request.quantity),
            SnapshotPolicy::Require,
        );
        if let Some(occurred_at) = request.occurred_at {
            draft.occurred_at = occurred_at;
        }
        draft.external_reference = Some(request.external_reference);
        draft.issue_category = request.issue_category;
        draft.staff_id = request.staff_id;
        draft.reason = request.notes;

        let committed = self.store.commit(draft)?;
        if committed.snapshot.quantity_on_hand < 0 {
            // Negative stock is valid but worth surfacing.
            warn!(
                component_id = %committed.snapshot.component_id,
                balance = committed.snapshot.quantity_on_hand,
                "issue drove quantity-on-hand negative"
            );
        }
        Ok(committed)
    }

    /// Issue multiple components in one logical request, best-effort.
    ///
    /// Each item is an independent atomic commit; a failure on one component
    /// does not abort the others. All failures are collected and returned
    /// together as [`EngineError::BatchPartial`] so the caller can remediate
    /// and retry only the failed subset.
    #[instrument(skip(self, requests), fields(items = requests.len()), err)]
    pub fn batch_issue(
        &self,
        requests: Vec<IssueRequest>,
    ) -> Result<Vec<IssuedItem>, EngineError> {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for request in requests {
            let component_id = request.component_id;
            let quantity = request.quantity;
            match self.manual_issue(request) {
                Ok(committed) => succeeded.push(IssuedItem {
                    component_id,
                    quantity,
                    transaction_id: committed.transaction.id,
                }),
                Err(error) => failed.push(FailedItem {
                    component_id,
                    quantity,
                    error,
                }),
            }
        }

        if failed.is_empty() {
            Ok(succeeded)
        } else {
            Err(EngineError::BatchPartial(BatchFailure { succeeded, failed }))
        }
    }

    /// Reverse all or part of a prior ledger entry with a new compensating
    /// entry. The original row is never altered.
    #[instrument(skip(self, request), fields(transaction_id = %request.transaction_id), err)]
    pub fn reverse(&self, request: ReverseTransaction) -> Result<CommittedMutation, EngineError> {
        if request.reason.trim().is_empty() {
            return Err(EngineError::Validation(
                "reversal reason is required".to_string(),
            ));
        }
        let original = self
            .store
            .find_transaction(request.transaction_id)?
            .ok_or(EngineError::NotFound)?;

        let delta = reversal_delta(original.quantity, request.quantity_to_reverse)?;

        let mut draft = TransactionDraft::new(
            original.component_id,
            reversal_kind(original.quantity),
            MutationDelta::Apply(delta),
            SnapshotPolicy::Require,
        );
        draft.reason = Some(format!("reversal of {}: {}", original.id, request.reason));
        draft.external_reference = original.external_reference.clone();
        draft.issue_category = original.issue_category.clone();
        draft.acting_user_id = request.acting_user_id;

        let committed = self.store.commit(draft)?;
        info!(
            component_id = %committed.transaction.component_id,
            original = %original.id,
            delta = committed.transaction.quantity,
            "transaction reversed"
        );
        Ok(committed)
    }

    /// Initialize tracking for a component that has no snapshot yet.
    ///
    /// This is the remediation path for [`EngineError::MissingInventory`]:
    /// create the snapshot, then retry the issue.
    #[instrument(skip(self), fields(component_id = %component_id), err)]
    pub fn initialize_snapshot(
        &self,
        component_id: ComponentId,
        initial_quantity: i64,
        reorder_level: i64,
        location: Option<String>,
    ) -> Result<InventorySnapshot, EngineError> {
        let snapshot = InventorySnapshot {
            component_id,
            quantity_on_hand: initial_quantity,
            reorder_level,
            location,
        };
        match self.store.create_snapshot(snapshot) {
            Ok(snapshot) => Ok(snapshot),
            Err(StoreError::Conflict(msg)) => Err(EngineError::InvalidState(msg)),
            Err(other) => Err(other.into()),
        }
    }

    /// Snapshot plus the most recent `limit` ledger entries, with the
    /// derived running balances for display.
    ///
    /// Cross-checks the derivation against the recorded `balance_after`
    /// values and logs a warning on divergence (incomplete window or
    /// snapshot drift); recorded values stay authoritative.
    #[instrument(skip(self), fields(component_id = %component_id, limit), err)]
    pub fn recent_activity(
        &self,
        component_id: ComponentId,
        limit: usize,
    ) -> Result<RecentActivity, EngineError> {
        let snapshot = self
            .store
            .snapshot(component_id)?
            .ok_or(EngineError::MissingInventory { component_id })?;
        let transactions = self.store.list_recent(component_id, limit)?;

        let derived_balances = running_balances(snapshot.quantity_on_hand, &transactions);
        if let Some(index) = first_divergence(snapshot.quantity_on_hand, &transactions) {
            warn!(
                component_id = %component_id,
                index,
                recorded = transactions[index].balance_after,
                derived = derived_balances[index],
                "derived balance diverges from recorded balance_after"
            );
        }

        Ok(RecentActivity {
            snapshot,
            transactions,
            derived_balances,
        })
    }
}
