//! Integration tests for the full mutation + picking flow.
//!
//! Tests: engine → store commit → ledger + snapshot, and the picking-list
//! lifecycle over it, using the in-memory store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use millstock_core::ComponentId;
    use millstock_ledger::{AdjustMode, TransactionKind, running_balances};
    use millstock_picking::PendingStatus;
    use millstock_store::{InMemoryStockStore, StockStore};

    use crate::error::EngineError;
    use crate::mutation::{AdjustStock, IssueRequest, MutationEngine, ReverseTransaction};
    use crate::picking::{CreatePickingList, PickingService};

    fn setup() -> (
        MutationEngine<Arc<InMemoryStockStore>>,
        PickingService<Arc<InMemoryStockStore>>,
        Arc<InMemoryStockStore>,
    ) {
        let store = Arc::new(InMemoryStockStore::new());
        (
            MutationEngine::new(store.clone()),
            PickingService::new(store.clone()),
            store,
        )
    }

    fn adjust_set(component_id: ComponentId, magnitude: i64) -> AdjustStock {
        AdjustStock {
            component_id,
            mode: AdjustMode::Set,
            magnitude,
            reason_code: "stocktake".to_string(),
            notes: None,
            acting_user_id: None,
        }
    }

    fn issue(component_id: ComponentId, quantity: i64) -> IssueRequest {
        IssueRequest {
            component_id,
            quantity,
            issue_category: Some("production".to_string()),
            external_reference: "WO-1042".to_string(),
            staff_id: None,
            notes: None,
            occurred_at: None,
        }
    }

    #[test]
    fn adjust_set_round_trip() {
        let (engine, _, store) = setup();
        let component_id = ComponentId::new();
        engine.adjust(adjust_set(component_id, 30)).unwrap();

        let committed = engine.adjust(adjust_set(component_id, 50)).unwrap();
        assert_eq!(committed.transaction.quantity, 20);
        assert_eq!(committed.transaction.kind, TransactionKind::Adjustment);
        assert_eq!(committed.snapshot.quantity_on_hand, 50);
        assert_eq!(store.list_recent(component_id, 10).unwrap().len(), 2);
    }

    #[test]
    fn set_to_current_quantity_is_rejected_as_validation() {
        let (engine, _, store) = setup();
        let component_id = ComponentId::new();
        engine.adjust(adjust_set(component_id, 30)).unwrap();

        let err = engine.adjust(adjust_set(component_id, 30)).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(store.list_recent(component_id, 10).unwrap().len(), 1);
    }

    #[test]
    fn issue_with_insufficient_stock_succeeds_into_negative() {
        let (engine, _, _) = setup();
        let component_id = ComponentId::new();
        engine.adjust(adjust_set(component_id, 5)).unwrap();

        let committed = engine.manual_issue(issue(component_id, 7)).unwrap();
        assert_eq!(committed.transaction.quantity, -7);
        assert_eq!(committed.transaction.kind, TransactionKind::Issue);
        assert_eq!(committed.snapshot.quantity_on_hand, -2);
    }

    #[test]
    fn issue_against_untracked_component_is_missing_inventory() {
        let (engine, _, store) = setup();
        let component_id = ComponentId::new();

        let err = engine.manual_issue(issue(component_id, 3)).unwrap_err();
        assert_eq!(err, EngineError::MissingInventory { component_id });
        assert!(store.list_recent(component_id, 10).unwrap().is_empty());

        // Remediation path: initialize tracking, retry.
        engine
            .initialize_snapshot(component_id, 0, 0, None)
            .unwrap();
        let committed = engine.manual_issue(issue(component_id, 3)).unwrap();
        assert_eq!(committed.snapshot.quantity_on_hand, -3);
    }

    #[test]
    fn initialize_snapshot_twice_is_invalid_state() {
        let (engine, _, _) = setup();
        let component_id = ComponentId::new();
        engine
            .initialize_snapshot(component_id, 10, 2, Some("A3".to_string()))
            .unwrap();
        let err = engine
            .initialize_snapshot(component_id, 0, 0, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn full_reversal_cancels_the_original() {
        let (engine, _, _) = setup();
        let component_id = ComponentId::new();
        engine.adjust(adjust_set(component_id, 10)).unwrap();
        let issued = engine.manual_issue(issue(component_id, 7)).unwrap();
        assert_eq!(issued.snapshot.quantity_on_hand, 3);

        let reversed = engine
            .reverse(ReverseTransaction {
                transaction_id: issued.transaction.id,
                quantity_to_reverse: 7,
                reason: "wrong work order".to_string(),
                acting_user_id: None,
            })
            .unwrap();
        assert_eq!(reversed.transaction.quantity, 7);
        assert_eq!(reversed.transaction.kind, TransactionKind::Return);
        // Net effect of original + reversal is zero.
        assert_eq!(reversed.snapshot.quantity_on_hand, 10);
    }

    #[test]
    fn partial_reversal_restores_only_the_portion() {
        let (engine, _, _) = setup();
        let component_id = ComponentId::new();
        engine.adjust(adjust_set(component_id, 10)).unwrap();
        let issued = engine.manual_issue(issue(component_id, 6)).unwrap();

        let reversed = engine
            .reverse(ReverseTransaction {
                transaction_id: issued.transaction.id,
                quantity_to_reverse: 2,
                reason: "over-picked".to_string(),
                acting_user_id: None,
            })
            .unwrap();
        assert_eq!(reversed.transaction.quantity, 2);
        assert_eq!(reversed.snapshot.quantity_on_hand, 6);

        let err = engine
            .reverse(ReverseTransaction {
                transaction_id: issued.transaction.id,
                quantity_to_reverse: 7,
                reason: "too much".to_string(),
                acting_user_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn reversing_an_unknown_transaction_is_not_found() {
        let (engine, _, _) = setup();
        let err = engine
            .reverse(ReverseTransaction {
                transaction_id: millstock_core::TransactionId::new(),
                quantity_to_reverse: 1,
                reason: "n/a".to_string(),
                acting_user_id: None,
            })
            .unwrap_err();
        assert_eq!(err, EngineError::NotFound);
    }

    #[test]
    fn batch_issue_is_best_effort() {
        let (engine, _, _) = setup();
        let tracked = ComponentId::new();
        let untracked = ComponentId::new();
        engine.adjust(adjust_set(tracked, 20)).unwrap();

        let err = engine
            .batch_issue(vec![issue(tracked, 5), issue(untracked, 3)])
            .unwrap_err();
        let EngineError::BatchPartial(failure) = err else {
            panic!("expected BatchPartial");
        };
        assert_eq!(failure.succeeded.len(), 1);
        assert_eq!(failure.succeeded[0].component_id, tracked);
        assert_eq!(failure.failed.len(), 1);
        assert_eq!(failure.failed[0].component_id, untracked);
        assert_eq!(
            failure.failed[0].error,
            EngineError::MissingInventory {
                component_id: untracked
            }
        );

        // The tracked component's issue really applied.
        assert_eq!(
            engine.recent_activity(tracked, 10).unwrap().snapshot.quantity_on_hand,
            15
        );
    }

    #[test]
    fn recent_activity_reconstructs_recorded_balances() {
        let (engine, _, _) = setup();
        let component_id = ComponentId::new();
        engine.adjust(adjust_set(component_id, 10)).unwrap();
        engine.manual_issue(issue(component_id, 3)).unwrap();
        engine.adjust(adjust_set(component_id, 12)).unwrap();

        let activity = engine.recent_activity(component_id, 10).unwrap();
        assert_eq!(activity.snapshot.quantity_on_hand, 12);
        assert_eq!(activity.transactions.len(), 3);
        assert_eq!(activity.derived_balances, vec![12, 7, 10]);
        for (tx, derived) in activity
            .transactions
            .iter()
            .zip(activity.derived_balances.iter())
        {
            assert_eq!(tx.balance_after, *derived);
        }

        // Same reconstruction as the pure derivation.
        assert_eq!(
            activity.derived_balances,
            running_balances(activity.snapshot.quantity_on_hand, &activity.transactions)
        );
    }

    #[test]
    fn picking_lifecycle_complete() {
        let (engine, picking, store) = setup();
        let bolt = ComponentId::new();
        let washer = ComponentId::new();
        engine.adjust(adjust_set(bolt, 50)).unwrap();
        engine.adjust(adjust_set(washer, 40)).unwrap();

        let list = picking
            .create_pending(CreatePickingList {
                external_reference: "WO-2001".to_string(),
                issue_category: Some("production".to_string()),
                staff_id: None,
                notes: None,
                items: vec![(bolt, 8), (washer, 4)],
            })
            .unwrap();
        assert_eq!(list.status(), PendingStatus::Pending);
        // Staging has no ledger effect.
        assert_eq!(store.list_recent(bolt, 10).unwrap().len(), 1);

        let completed = picking.complete_pending(list.id()).unwrap();
        assert_eq!(completed.status(), PendingStatus::Issued);
        assert!(completed.items().iter().all(|item| item.is_issued()));

        let bolt_txs = store.list_recent(bolt, 10).unwrap();
        assert_eq!(bolt_txs.len(), 2);
        assert_eq!(bolt_txs[0].quantity, -8);
        assert_eq!(bolt_txs[0].external_reference.as_deref(), Some("WO-2001"));
        assert_eq!(store.snapshot(bolt).unwrap().unwrap().quantity_on_hand, 42);
        assert_eq!(store.snapshot(washer).unwrap().unwrap().quantity_on_hand, 36);

        // Terminal: completing again is invalid.
        let err = picking.complete_pending(list.id()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn picking_lifecycle_cancel() {
        let (engine, picking, store) = setup();
        let component_id = ComponentId::new();
        engine.adjust(adjust_set(component_id, 10)).unwrap();

        let list = picking
            .create_pending(CreatePickingList {
                external_reference: "WO-2002".to_string(),
                issue_category: None,
                staff_id: None,
                notes: None,
                items: vec![(component_id, 2)],
            })
            .unwrap();

        let cancelled = picking.cancel_pending(list.id()).unwrap();
        assert_eq!(cancelled.status(), PendingStatus::Cancelled);
        assert_eq!(store.list_recent(component_id, 10).unwrap().len(), 1);
        assert_eq!(
            store.snapshot(component_id).unwrap().unwrap().quantity_on_hand,
            10
        );

        let err = picking.cancel_pending(list.id()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn interrupted_completion_resumes_by_item_identity() {
        let (engine, picking, store) = setup();
        let tracked = ComponentId::new();
        let untracked = ComponentId::new();
        engine.adjust(adjust_set(tracked, 30)).unwrap();

        let list = picking
            .create_pending(CreatePickingList {
                external_reference: "WO-2003".to_string(),
                issue_category: None,
                staff_id: None,
                notes: None,
                items: vec![(tracked, 5), (untracked, 2)],
            })
            .unwrap();

        let err = picking.complete_pending(list.id()).unwrap_err();
        let EngineError::BatchPartial(failure) = err else {
            panic!("expected BatchPartial");
        };
        assert_eq!(failure.succeeded.len(), 1);
        assert_eq!(failure.failed.len(), 1);
        assert_eq!(
            failure.failed[0].error,
            EngineError::MissingInventory {
                component_id: untracked
            }
        );

        // List stays pending with the issued item recorded.
        let reloaded = store.fetch_pending(list.id()).unwrap().unwrap();
        assert_eq!(reloaded.status(), PendingStatus::Pending);
        assert_eq!(reloaded.issued_items().count(), 1);

        // Cancelling a partially issued list is refused.
        let err = picking.cancel_pending(list.id()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        // Remediate and retry: only the remaining item is issued.
        engine.initialize_snapshot(untracked, 0, 0, None).unwrap();
        let completed = picking.complete_pending(list.id()).unwrap();
        assert_eq!(completed.status(), PendingStatus::Issued);
        assert_eq!(store.list_recent(tracked, 10).unwrap().len(), 2);
        assert_eq!(store.list_recent(untracked, 10).unwrap().len(), 1);
        assert_eq!(
            store.snapshot(untracked).unwrap().unwrap().quantity_on_hand,
            -2
        );
    }

    #[test]
    fn create_pending_validates_inputs() {
        let (_, picking, _) = setup();

        let err = picking
            .create_pending(CreatePickingList {
                external_reference: " ".to_string(),
                issue_category: None,
                staff_id: None,
                notes: None,
                items: vec![(ComponentId::new(), 1)],
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = picking
            .create_pending(CreatePickingList {
                external_reference: "WO-1".to_string(),
                issue_category: None,
                staff_id: None,
                notes: None,
                items: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
