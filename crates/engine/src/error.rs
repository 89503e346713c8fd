//! Caller-facing error taxonomy for stock mutations.

use thiserror::Error;

use millstock_core::{ComponentId, DomainError, TransactionId};
use millstock_store::StoreError;

/// Error returned by the mutation engine and picking service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Rejected before any write was attempted (missing required field,
    /// zero-magnitude adjustment, non-positive issue quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// No snapshot exists for the component being issued against. Actionable:
    /// initialize a snapshot for the component and retry. No ledger entry
    /// was written.
    #[error("no inventory snapshot exists for component {component_id}")]
    MissingInventory { component_id: ComponentId },

    /// The referenced transaction or picking list does not exist.
    #[error("not found")]
    NotFound,

    /// The operation is not valid for the record's current state (terminal
    /// picking list, partially issued list being cancelled, snapshot already
    /// initialized).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The atomic ledger + snapshot write failed. Nothing partial is
    /// observable on this path; the unit either fully applied or not at all.
    #[error("mutation failed: {0}")]
    Mutation(StoreError),

    /// A batch issuance or picking-list completion applied partially.
    /// Carries the items that failed (with their error kind) and the items
    /// already issued, so the caller can remediate and retry the failed
    /// subset. The engine never retries automatically.
    #[error("batch partially applied: {0}")]
    BatchPartial(BatchFailure),
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::MissingSnapshot(component_id) => {
                EngineError::MissingInventory { component_id }
            }
            StoreError::EmptyDelta => {
                EngineError::Validation("adjustment does not change the quantity".to_string())
            }
            StoreError::NotFound => EngineError::NotFound,
            other => EngineError::Mutation(other),
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => EngineError::Validation(msg),
            DomainError::InvalidId(msg) => EngineError::Validation(msg),
            DomainError::InvariantViolation(msg) => EngineError::InvalidState(msg),
            DomainError::Conflict(msg) => EngineError::InvalidState(msg),
            DomainError::NotFound => EngineError::NotFound,
        }
    }
}

/// An item that reached the ledger, with the entry it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedItem {
    pub component_id: ComponentId,
    pub quantity: i64,
    pub transaction_id: TransactionId,
}

/// An item that failed, with enough identity (component, attempted quantity)
/// to support remediation and manual reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub component_id: ComponentId,
    pub quantity: i64,
    pub error: EngineError,
}

/// Outcome detail of a partially applied batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchFailure {
    pub succeeded: Vec<IssuedItem>,
    pub failed: Vec<FailedItem>,
}

impl core::fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} item(s) issued, {} item(s) failed",
            self.succeeded.len(),
            self.failed.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_snapshot_maps_to_missing_inventory() {
        let component_id = ComponentId::new();
        let err: EngineError = StoreError::MissingSnapshot(component_id).into();
        assert_eq!(err, EngineError::MissingInventory { component_id });
    }

    #[test]
    fn empty_delta_maps_to_validation() {
        let err: EngineError = StoreError::EmptyDelta.into();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn backend_failure_maps_to_mutation() {
        let err: EngineError = StoreError::Backend("boom".to_string()).into();
        assert!(matches!(err, EngineError::Mutation(_)));
    }

    #[test]
    fn domain_invariant_maps_to_invalid_state() {
        let err: EngineError = DomainError::invariant("terminal").into();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }
}
