//! Picking-list orchestration over the mutation engine.
//!
//! A picking list stages intent with no ledger effect; completion drives one
//! manual issue per item. Progress is persisted after every issued item, so
//! an interrupted completion leaves a pending list that records exactly which
//! items reached the ledger, and a retry resumes with the remainder.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use millstock_core::{ComponentId, PendingIssuanceId, StaffId};
use millstock_picking::PendingIssuance;
use millstock_store::StockStore;

use crate::error::{BatchFailure, EngineError, FailedItem, IssuedItem};
use crate::mutation::{IssueRequest, MutationEngine};

/// Request: stage a multi-component withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePickingList {
    pub external_reference: String,
    pub issue_category: Option<String>,
    pub staff_id: Option<StaffId>,
    pub notes: Option<String>,
    pub items: Vec<(ComponentId, i64)>,
}

/// Staged-withdrawal lifecycle driver.
#[derive(Debug)]
pub struct PickingService<S: StockStore + Clone> {
    engine: MutationEngine<S>,
    store: S,
}

impl<S: StockStore + Clone> PickingService<S> {
    pub fn new(store: S) -> Self {
        Self {
            engine: MutationEngine::new(store.clone()),
            store,
        }
    }

    /// Stage a new picking list. No ledger or snapshot effect.
    #[instrument(skip(self, request), fields(external_reference = %request.external_reference), err)]
    pub fn create_pending(
        &self,
        request: CreatePickingList,
    ) -> Result<PendingIssuance, EngineError> {
        let list = PendingIssuance::create(
            request.external_reference,
            request.issue_category,
            request.staff_id,
            request.notes,
            request.items,
        )?;
        self.store.insert_pending(&list)?;
        info!(pending_id = %list.id(), items = list.items().len(), "picking list staged");
        Ok(list)
    }

    /// Complete a pending list: issue every item that has not reached the
    /// ledger yet, then mark the list issued.
    ///
    /// Per-item best-effort: a failing item does not abort the rest. On any
    /// failure the list stays pending with the successful items' transaction
    /// ids persisted, and [`EngineError::BatchPartial`] reports both sets so
    /// the caller can remediate (e.g. initialize a missing snapshot) and
    /// call this again; the retry skips items already issued.
    #[instrument(skip(self), fields(pending_id = %pending_id), err)]
    pub fn complete_pending(
        &self,
        pending_id: PendingIssuanceId,
    ) -> Result<PendingIssuance, EngineError> {
        let mut list = self
            .store
            .fetch_pending(pending_id)?
            .ok_or(EngineError::NotFound)?;
        if list.status().is_terminal() {
            return Err(EngineError::InvalidState(format!(
                "picking list {} is already {:?}",
                pending_id,
                list.status()
            )));
        }

        let mut failed = Vec::new();
        for index in 0..list.items().len() {
            let item = &list.items()[index];
            if item.is_issued() {
                continue;
            }
            let component_id = item.component_id;
            let quantity = item.quantity;

            let outcome = self.engine.manual_issue(IssueRequest {
                component_id,
                quantity,
                issue_category: list.issue_category().map(str::to_string),
                external_reference: list.external_reference().to_string(),
                staff_id: list.staff_id(),
                notes: list.notes().map(str::to_string),
                occurred_at: None,
            });
            match outcome {
                Ok(committed) => {
                    list.record_issued(index, committed.transaction.id)?;
                    // Persist progress immediately so an interruption after
                    // this point still knows the item was issued.
                    self.store.update_pending(&list)?;
                }
                Err(error) => failed.push(FailedItem {
                    component_id,
                    quantity,
                    error,
                }),
            }
        }

        if !failed.is_empty() {
            let succeeded = list
                .issued_items()
                .map(|(item, transaction_id)| IssuedItem {
                    component_id: item.component_id,
                    quantity: item.quantity,
                    transaction_id,
                })
                .collect();
            return Err(EngineError::BatchPartial(BatchFailure { succeeded, failed }));
        }

        list.finalize_issued()?;
        self.store.update_pending(&list)?;
        info!(pending_id = %list.id(), items = list.items().len(), "picking list issued");
        Ok(list)
    }

    /// Cancel a pending list. Valid only before any item has been issued;
    /// no ledger or snapshot effect.
    #[instrument(skip(self), fields(pending_id = %pending_id), err)]
    pub fn cancel_pending(
        &self,
        pending_id: PendingIssuanceId,
    ) -> Result<PendingIssuance, EngineError> {
        let mut list = self
            .store
            .fetch_pending(pending_id)?
            .ok_or(EngineError::NotFound)?;
        list.cancel()?;
        self.store.update_pending(&list)?;
        info!(pending_id = %list.id(), "picking list cancelled");
        Ok(list)
    }

    /// Load a picking list by id.
    pub fn fetch_pending(
        &self,
        pending_id: PendingIssuanceId,
    ) -> Result<Option<PendingIssuance>, EngineError> {
        Ok(self.store.fetch_pending(pending_id)?)
    }

    /// The engine this service drives, for callers that need both surfaces.
    pub fn engine(&self) -> &MutationEngine<S> {
        &self.engine
    }
}
