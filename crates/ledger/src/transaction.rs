use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millstock_core::{
    ComponentId, PurchaseOrderId, SalesOrderId, StaffId, TransactionId, UserId,
};

/// Ledger transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Purchase,
    Issue,
    Return,
    Adjustment,
    Sale,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Purchase => "purchase",
            TransactionKind::Issue => "issue",
            TransactionKind::Return => "return",
            TransactionKind::Adjustment => "adjustment",
            TransactionKind::Sale => "sale",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable ledger entry for one component quantity change.
///
/// Entries are append-only: corrections are expressed as new compensating
/// entries, never as updates or deletes. `balance_after` is the
/// quantity-on-hand immediately after this entry, denormalized at write time
/// inside the same atomic unit as the snapshot update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTransaction {
    pub id: TransactionId,
    pub component_id: ComponentId,
    /// Signed delta; positive increases stock.
    pub quantity: i64,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    /// Quantity-on-hand right after this transaction committed.
    pub balance_after: i64,
    pub sales_order_id: Option<SalesOrderId>,
    pub purchase_order_id: Option<PurchaseOrderId>,
    pub staff_id: Option<StaffId>,
    pub acting_user_id: Option<UserId>,
    pub reason: Option<String>,
    pub external_reference: Option<String>,
    pub issue_category: Option<String>,
}

/// How a draft's quantity change is expressed.
///
/// `SetTo` exists so "set quantity to N" adjustments can be resolved to a
/// relative delta *under the store's component lock*, where the current
/// quantity is authoritative. Resolving it from a caller-side read would race
/// with concurrent mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationDelta {
    /// Apply a relative signed delta.
    Apply(i64),
    /// Set the quantity-on-hand to an absolute value; the store resolves the
    /// delta as `target - current` while holding the component lock.
    SetTo(i64),
}

/// What the store should do when no snapshot exists for the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotPolicy {
    /// Fail with a distinguished missing-snapshot error. Used by issuance:
    /// the caller must explicitly initialize tracking before issuing.
    Require,
    /// Create a zero snapshot lazily. Used by adjustments.
    CreateIfMissing,
}

/// An uncommitted ledger entry.
///
/// The engine builds a draft after validation; the store turns it into an
/// [`InventoryTransaction`] by resolving the delta and computing
/// `balance_after` inside the atomic commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub id: TransactionId,
    pub component_id: ComponentId,
    pub kind: TransactionKind,
    pub delta: MutationDelta,
    pub snapshot_policy: SnapshotPolicy,
    pub occurred_at: DateTime<Utc>,
    pub sales_order_id: Option<SalesOrderId>,
    pub purchase_order_id: Option<PurchaseOrderId>,
    pub staff_id: Option<StaffId>,
    pub acting_user_id: Option<UserId>,
    pub reason: Option<String>,
    pub external_reference: Option<String>,
    pub issue_category: Option<String>,
}

impl TransactionDraft {
    /// Draft with a fresh id, the current time, and no annotations.
    pub fn new(
        component_id: ComponentId,
        kind: TransactionKind,
        delta: MutationDelta,
        snapshot_policy: SnapshotPolicy,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            component_id,
            kind,
            delta,
            snapshot_policy,
            occurred_at: Utc::now(),
            sales_order_id: None,
            purchase_order_id: None,
            staff_id: None,
            acting_user_id: None,
            reason: None,
            external_reference: None,
            issue_category: None,
        }
    }

    /// Materialize the committed entry once the store has resolved the delta
    /// and the post-transaction balance under the component lock.
    pub fn into_transaction(self, resolved_delta: i64, balance_after: i64) -> InventoryTransaction {
        InventoryTransaction {
            id: self.id,
            component_id: self.component_id,
            quantity: resolved_delta,
            kind: self.kind,
            occurred_at: self.occurred_at,
            balance_after,
            sales_order_id: self.sales_order_id,
            purchase_order_id: self.purchase_order_id,
            staff_id: self.staff_id,
            acting_user_id: self.acting_user_id,
            reason: self.reason,
            external_reference: self.external_reference,
            issue_category: self.issue_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_materializes_with_resolved_delta_and_balance() {
        let component_id = ComponentId::new();
        let draft = TransactionDraft::new(
            component_id,
            TransactionKind::Adjustment,
            MutationDelta::SetTo(50),
            SnapshotPolicy::CreateIfMissing,
        );
        let id = draft.id;

        let tx = draft.into_transaction(20, 50);
        assert_eq!(tx.id, id);
        assert_eq!(tx.component_id, component_id);
        assert_eq!(tx.quantity, 20);
        assert_eq!(tx.balance_after, 50);
        assert_eq!(tx.kind, TransactionKind::Adjustment);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Issue).unwrap();
        assert_eq!(json, "\"issue\"");
    }
}
