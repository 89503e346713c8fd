use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millstock_core::{ComponentId, DomainError, DomainResult, PendingIssuanceId, StaffId, TransactionId};

/// Picking list lifecycle.
///
/// `pending → issued` and `pending → cancelled`; both targets are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingStatus {
    Pending,
    Issued,
    Cancelled,
}

impl PendingStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PendingStatus::Pending)
    }
}

/// One line of a staged withdrawal.
///
/// `transaction_id` is set the moment the line is actually issued, so an
/// interrupted completion records exactly which lines reached the ledger and
/// a retry can resume by item identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingItem {
    pub component_id: ComponentId,
    pub quantity: i64,
    pub transaction_id: Option<TransactionId>,
}

impl PendingItem {
    pub fn new(component_id: ComponentId, quantity: i64) -> Self {
        Self {
            component_id,
            quantity,
            transaction_id: None,
        }
    }

    pub fn is_issued(&self) -> bool {
        self.transaction_id.is_some()
    }
}

/// A staged, not-yet-applied multi-component withdrawal request.
///
/// While pending it contributes nothing to any snapshot or ledger; only the
/// issued transition has ledger effects, and those are driven externally
/// (one manual issue per item). Terminal lists are immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingIssuance {
    id: PendingIssuanceId,
    external_reference: String,
    issue_category: Option<String>,
    staff_id: Option<StaffId>,
    notes: Option<String>,
    status: PendingStatus,
    created_at: DateTime<Utc>,
    items: Vec<PendingItem>,
}

impl PendingIssuance {
    /// Stage a new withdrawal. Requires a non-empty external reference and a
    /// non-empty item list with positive quantities.
    pub fn create(
        external_reference: impl Into<String>,
        issue_category: Option<String>,
        staff_id: Option<StaffId>,
        notes: Option<String>,
        items: Vec<(ComponentId, i64)>,
    ) -> DomainResult<Self> {
        let external_reference = external_reference.into();
        if external_reference.trim().is_empty() {
            return Err(DomainError::validation(
                "external reference cannot be empty",
            ));
        }
        if items.is_empty() {
            return Err(DomainError::validation(
                "picking list requires at least one item",
            ));
        }
        for (component_id, quantity) in &items {
            if *quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "item quantity must be positive (component {component_id})"
                )));
            }
        }

        Ok(Self {
            id: PendingIssuanceId::new(),
            external_reference,
            issue_category,
            staff_id,
            notes,
            status: PendingStatus::Pending,
            created_at: Utc::now(),
            items: items
                .into_iter()
                .map(|(component_id, quantity)| PendingItem::new(component_id, quantity))
                .collect(),
        })
    }

    /// Rehydrate a persisted picking list from its stored parts.
    ///
    /// For storage backends only; invariants are assumed to have been
    /// enforced when the list was originally created and mutated.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: PendingIssuanceId,
        external_reference: String,
        issue_category: Option<String>,
        staff_id: Option<StaffId>,
        notes: Option<String>,
        status: PendingStatus,
        created_at: DateTime<Utc>,
        items: Vec<PendingItem>,
    ) -> Self {
        Self {
            id,
            external_reference,
            issue_category,
            staff_id,
            notes,
            status,
            created_at,
            items,
        }
    }

    pub fn id(&self) -> PendingIssuanceId {
        self.id
    }

    pub fn external_reference(&self) -> &str {
        &self.external_reference
    }

    pub fn issue_category(&self) -> Option<&str> {
        self.issue_category.as_deref()
    }

    pub fn staff_id(&self) -> Option<StaffId> {
        self.staff_id
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn status(&self) -> PendingStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[PendingItem] {
        &self.items
    }

    /// Items that have not reached the ledger yet.
    pub fn remaining_items(&self) -> impl Iterator<Item = &PendingItem> {
        self.items.iter().filter(|item| !item.is_issued())
    }

    /// Items already issued, with their ledger transaction ids.
    pub fn issued_items(&self) -> impl Iterator<Item = (&PendingItem, TransactionId)> {
        self.items
            .iter()
            .filter_map(|item| item.transaction_id.map(|tx| (item, tx)))
    }

    fn ensure_pending(&self) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "picking list is {} and cannot change",
                match self.status {
                    PendingStatus::Issued => "issued",
                    PendingStatus::Cancelled => "cancelled",
                    PendingStatus::Pending => unreachable!(),
                }
            )));
        }
        Ok(())
    }

    /// Record that the item at `index` was issued as `transaction_id`.
    pub fn record_issued(&mut self, index: usize, transaction_id: TransactionId) -> DomainResult<()> {
        self.ensure_pending()?;
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(DomainError::not_found)?;
        if item.transaction_id.is_some() {
            return Err(DomainError::invariant(format!(
                "item {index} was already issued"
            )));
        }
        item.transaction_id = Some(transaction_id);
        Ok(())
    }

    /// Transition to issued. Valid only from pending and only once every
    /// item carries a transaction id.
    pub fn finalize_issued(&mut self) -> DomainResult<()> {
        self.ensure_pending()?;
        if let Some(unissued) = self.items.iter().position(|item| !item.is_issued()) {
            return Err(DomainError::invariant(format!(
                "item {unissued} has not been issued yet"
            )));
        }
        self.status = PendingStatus::Issued;
        Ok(())
    }

    /// Transition to cancelled. Valid only from pending, and refused once
    /// any item has been issued: a partially applied list must be completed
    /// or manually reversed, never silently dropped.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.ensure_pending()?;
        if self.items.iter().any(PendingItem::is_issued) {
            return Err(DomainError::invariant(
                "picking list has issued items and cannot be cancelled",
            ));
        }
        self.status = PendingStatus::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_items() -> Vec<(ComponentId, i64)> {
        vec![(ComponentId::new(), 3), (ComponentId::new(), 5)]
    }

    fn pending() -> PendingIssuance {
        PendingIssuance::create("WO-1042", Some("production".to_string()), None, None, two_items())
            .unwrap()
    }

    #[test]
    fn create_starts_pending_with_unissued_items() {
        let list = pending();
        assert_eq!(list.status(), PendingStatus::Pending);
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.remaining_items().count(), 2);
        assert_eq!(list.issued_items().count(), 0);
    }

    #[test]
    fn empty_external_reference_is_rejected() {
        let err = PendingIssuance::create("  ", None, None, None, two_items()).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("external reference")),
            _ => panic!("expected Validation"),
        }
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let err = PendingIssuance::create("WO-1", None, None, None, vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn non_positive_item_quantity_is_rejected() {
        let err =
            PendingIssuance::create("WO-1", None, None, None, vec![(ComponentId::new(), 0)])
                .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn finalize_requires_every_item_issued() {
        let mut list = pending();
        list.record_issued(0, TransactionId::new()).unwrap();

        let err = list.finalize_issued().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        list.record_issued(1, TransactionId::new()).unwrap();
        list.finalize_issued().unwrap();
        assert_eq!(list.status(), PendingStatus::Issued);
    }

    #[test]
    fn issued_list_is_immutable() {
        let mut list = pending();
        list.record_issued(0, TransactionId::new()).unwrap();
        list.record_issued(1, TransactionId::new()).unwrap();
        list.finalize_issued().unwrap();

        assert!(list.cancel().is_err());
        assert!(list.record_issued(0, TransactionId::new()).is_err());
        assert!(list.finalize_issued().is_err());
    }

    #[test]
    fn cancel_from_pending_is_terminal() {
        let mut list = pending();
        list.cancel().unwrap();
        assert_eq!(list.status(), PendingStatus::Cancelled);
        assert!(list.cancel().is_err());
        assert!(list.record_issued(0, TransactionId::new()).is_err());
    }

    #[test]
    fn cancel_after_partial_issuance_is_refused() {
        let mut list = pending();
        list.record_issued(0, TransactionId::new()).unwrap();
        let err = list.cancel().unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) => assert!(msg.contains("issued items")),
            _ => panic!("expected InvariantViolation"),
        }
        assert_eq!(list.status(), PendingStatus::Pending);
    }

    #[test]
    fn double_issue_of_one_item_is_refused() {
        let mut list = pending();
        list.record_issued(0, TransactionId::new()).unwrap();
        assert!(list.record_issued(0, TransactionId::new()).is_err());
    }
}
