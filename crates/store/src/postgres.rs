//! Postgres-backed stock store.
//!
//! The commit path makes the atomic unit explicit as one database
//! transaction: lock the component's snapshot row (`SELECT ... FOR UPDATE`),
//! resolve the delta against the locked quantity, insert the ledger row with
//! its denormalized `balance_after`, update the snapshot, commit. The row
//! lock serializes concurrent mutations per component for the duration of
//! the unit, which is what prevents lost updates on `quantity_on_hand`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Code | StoreError | Scenario |
//! |------------|-----------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate snapshot / transaction / picking-list id |
//! | Database (other) | any other | `Backend` | Constraint or database errors |
//! | PoolClosed / RowNotFound / other | N/A | `Backend` | Transport failures |
//!
//! ## Thread Safety
//!
//! `PostgresStockStore` is `Send + Sync`; all operations go through the SQLx
//! connection pool. The synchronous [`StockStore`] trait is bridged with
//! `tokio::runtime::Handle::block_on`, so calls must originate inside a
//! tokio runtime.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use std::sync::Arc;
use tracing::instrument;

use millstock_core::{
    ComponentId, PendingIssuanceId, PurchaseOrderId, SalesOrderId, StaffId, TransactionId, UserId,
};
use millstock_ledger::{
    InventorySnapshot, InventoryTransaction, MutationDelta, SnapshotPolicy, TransactionDraft,
    TransactionKind,
};
use millstock_picking::{PendingIssuance, PendingItem, PendingStatus};

use super::r#trait::{CommittedMutation, StockStore, StoreError};

/// Postgres-backed implementation of [`StockStore`].
#[derive(Debug, Clone)]
pub struct PostgresStockStore {
    pool: Arc<PgPool>,
}

impl PostgresStockStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    #[instrument(skip(self), fields(component_id = %component_id), err)]
    async fn snapshot_async(
        &self,
        component_id: ComponentId,
    ) -> Result<Option<InventorySnapshot>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT component_id, quantity_on_hand, reorder_level, location
            FROM component_snapshots
            WHERE component_id = $1
            "#,
        )
        .bind(component_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("snapshot", e))?;

        match row {
            Some(row) => {
                let snapshot = SnapshotRow::from_row(&row)
                    .map_err(|e| StoreError::Serialization(format!("snapshot row: {e}")))?;
                Ok(Some(snapshot.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, snapshot), fields(component_id = %snapshot.component_id), err)]
    async fn create_snapshot_async(
        &self,
        snapshot: InventorySnapshot,
    ) -> Result<InventorySnapshot, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO component_snapshots (component_id, quantity_on_hand, reorder_level, location)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(snapshot.component_id.as_uuid())
        .bind(snapshot.quantity_on_hand)
        .bind(snapshot.reorder_level)
        .bind(&snapshot.location)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!(
                    "snapshot already exists for component {}",
                    snapshot.component_id
                ))
            } else {
                map_sqlx_error("create_snapshot", e)
            }
        })?;

        Ok(snapshot)
    }

    #[instrument(
        skip(self, draft),
        fields(component_id = %draft.component_id, kind = %draft.kind),
        err
    )]
    async fn commit_async(&self, draft: TransactionDraft) -> Result<CommittedMutation, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        // Lock the snapshot row for the duration of the atomic unit.
        let current = lock_snapshot_quantity(&mut tx, draft.component_id).await?;
        let current = match current {
            Some(quantity) => quantity,
            None => match draft.snapshot_policy {
                SnapshotPolicy::Require => {
                    tx.rollback()
                        .await
                        .map_err(|e| map_sqlx_error("rollback", e))?;
                    return Err(StoreError::MissingSnapshot(draft.component_id));
                }
                SnapshotPolicy::CreateIfMissing => {
                    sqlx::query(
                        r#"
                        INSERT INTO component_snapshots (component_id, quantity_on_hand, reorder_level, location)
                        VALUES ($1, 0, 0, NULL)
                        ON CONFLICT (component_id) DO NOTHING
                        "#,
                    )
                    .bind(draft.component_id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("init_snapshot", e))?;

                    // Re-acquire under lock; the row exists now.
                    lock_snapshot_quantity(&mut tx, draft.component_id)
                        .await?
                        .unwrap_or(0)
                }
            },
        };

        let delta = match draft.delta {
            MutationDelta::Apply(delta) => delta,
            MutationDelta::SetTo(target) => target - current,
        };
        if delta == 0 {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::EmptyDelta);
        }

        let balance_after = current + delta;
        let committed = draft.into_transaction(delta, balance_after);

        sqlx::query(
            r#"
            INSERT INTO inventory_transactions (
                id, component_id, quantity, kind, occurred_at, balance_after,
                sales_order_id, purchase_order_id, staff_id, acting_user_id,
                reason, external_reference, issue_category
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(committed.id.as_uuid())
        .bind(committed.component_id.as_uuid())
        .bind(committed.quantity)
        .bind(committed.kind.as_str())
        .bind(committed.occurred_at)
        .bind(committed.balance_after)
        .bind(committed.sales_order_id.map(|id| *id.as_uuid()))
        .bind(committed.purchase_order_id.map(|id| *id.as_uuid()))
        .bind(committed.staff_id.map(|id| *id.as_uuid()))
        .bind(committed.acting_user_id.map(|id| *id.as_uuid()))
        .bind(&committed.reason)
        .bind(&committed.external_reference)
        .bind(&committed.issue_category)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!("transaction {} already exists", committed.id))
            } else {
                map_sqlx_error("insert_transaction", e)
            }
        })?;

        let snapshot_row = sqlx::query(
            r#"
            UPDATE component_snapshots
            SET quantity_on_hand = $2
            WHERE component_id = $1
            RETURNING component_id, quantity_on_hand, reorder_level, location
            "#,
        )
        .bind(committed.component_id.as_uuid())
        .bind(balance_after)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_snapshot", e))?;

        let snapshot = SnapshotRow::from_row(&snapshot_row)
            .map_err(|e| StoreError::Serialization(format!("snapshot row: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e))?;

        Ok(CommittedMutation {
            transaction: committed,
            snapshot: snapshot.into(),
        })
    }

    #[instrument(skip(self), fields(component_id = %component_id, limit), err)]
    async fn list_recent_async(
        &self,
        component_id: ComponentId,
        limit: usize,
    ) -> Result<Vec<InventoryTransaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, component_id, quantity, kind, occurred_at, balance_after,
                   sales_order_id, purchase_order_id, staff_id, acting_user_id,
                   reason, external_reference, issue_category
            FROM inventory_transactions
            WHERE component_id = $1
            ORDER BY occurred_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(component_id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_recent", e))?;

        rows.iter()
            .map(|row| {
                TransactionRow::from_row(row)
                    .map_err(|e| StoreError::Serialization(format!("transaction row: {e}")))
                    .and_then(InventoryTransaction::try_from)
            })
            .collect()
    }

    #[instrument(skip(self), fields(transaction_id = %transaction_id), err)]
    async fn find_transaction_async(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<InventoryTransaction>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, component_id, quantity, kind, occurred_at, balance_after,
                   sales_order_id, purchase_order_id, staff_id, acting_user_id,
                   reason, external_reference, issue_category
            FROM inventory_transactions
            WHERE id = $1
            "#,
        )
        .bind(transaction_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_transaction", e))?;

        match row {
            Some(row) => {
                let parsed = TransactionRow::from_row(&row)
                    .map_err(|e| StoreError::Serialization(format!("transaction row: {e}")))?;
                Ok(Some(InventoryTransaction::try_from(parsed)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, list), fields(pending_id = %list.id()), err)]
    async fn insert_pending_async(&self, list: &PendingIssuance) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        sqlx::query(
            r#"
            INSERT INTO pending_issuances (id, external_reference, issue_category, staff_id, notes, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(list.id().as_uuid())
        .bind(list.external_reference())
        .bind(list.issue_category())
        .bind(list.staff_id().map(|id| *id.as_uuid()))
        .bind(list.notes())
        .bind(status_str(list.status()))
        .bind(list.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!("picking list {} already exists", list.id()))
            } else {
                map_sqlx_error("insert_pending", e)
            }
        })?;

        write_pending_items(&mut tx, list).await?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }

    #[instrument(skip(self), fields(pending_id = %pending_id), err)]
    async fn fetch_pending_async(
        &self,
        pending_id: PendingIssuanceId,
    ) -> Result<Option<PendingIssuance>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, external_reference, issue_category, staff_id, notes, status, created_at
            FROM pending_issuances
            WHERE id = $1
            "#,
        )
        .bind(pending_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_pending", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let list_row = PendingRow::from_row(&row)
            .map_err(|e| StoreError::Serialization(format!("pending row: {e}")))?;

        let item_rows = sqlx::query(
            r#"
            SELECT component_id, quantity, transaction_id
            FROM pending_issuance_items
            WHERE pending_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(pending_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_pending_items", e))?;

        let items = item_rows
            .iter()
            .map(|row| {
                PendingItemRow::from_row(row)
                    .map(PendingItem::from)
                    .map_err(|e| StoreError::Serialization(format!("pending item row: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(list_row.into_pending(items)?))
    }

    #[instrument(skip(self, list), fields(pending_id = %list.id()), err)]
    async fn update_pending_async(&self, list: &PendingIssuance) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        let stored = sqlx::query(
            r#"
            SELECT status FROM pending_issuances WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(list.id().as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("lock_pending", e))?;

        let Some(stored) = stored else {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::NotFound);
        };
        let stored_status: String = stored
            .try_get("status")
            .map_err(|e| StoreError::Serialization(format!("pending status: {e}")))?;
        if status_from_str(&stored_status)?.is_terminal() {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::Conflict(format!(
                "picking list {} is terminal",
                list.id()
            )));
        }

        sqlx::query(
            r#"
            UPDATE pending_issuances SET status = $2 WHERE id = $1
            "#,
        )
        .bind(list.id().as_uuid())
        .bind(status_str(list.status()))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_pending", e))?;

        sqlx::query("DELETE FROM pending_issuance_items WHERE pending_id = $1")
            .bind(list.id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("clear_pending_items", e))?;
        write_pending_items(&mut tx, list).await?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }
}

/// Read and lock the snapshot quantity for one component.
async fn lock_snapshot_quantity(
    tx: &mut Transaction<'_, Postgres>,
    component_id: ComponentId,
) -> Result<Option<i64>, StoreError> {
    let row = sqlx::query(
        r#"
        SELECT quantity_on_hand
        FROM component_snapshots
        WHERE component_id = $1
        FOR UPDATE
        "#,
    )
    .bind(component_id.as_uuid())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("lock_snapshot", e))?;

    match row {
        Some(row) => {
            let quantity: i64 = row
                .try_get("quantity_on_hand")
                .map_err(|e| StoreError::Serialization(format!("quantity_on_hand: {e}")))?;
            Ok(Some(quantity))
        }
        None => Ok(None),
    }
}

async fn write_pending_items(
    tx: &mut Transaction<'_, Postgres>,
    list: &PendingIssuance,
) -> Result<(), StoreError> {
    for (position, item) in list.items().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO pending_issuance_items (pending_id, position, component_id, quantity, transaction_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(list.id().as_uuid())
        .bind(position as i32)
        .bind(item.component_id.as_uuid())
        .bind(item.quantity)
        .bind(item.transaction_id.map(|id| *id.as_uuid()))
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_pending_item", e))?;
    }
    Ok(())
}

fn status_str(status: PendingStatus) -> &'static str {
    match status {
        PendingStatus::Pending => "pending",
        PendingStatus::Issued => "issued",
        PendingStatus::Cancelled => "cancelled",
    }
}

fn status_from_str(s: &str) -> Result<PendingStatus, StoreError> {
    match s {
        "pending" => Ok(PendingStatus::Pending),
        "issued" => Ok(PendingStatus::Issued),
        "cancelled" => Ok(PendingStatus::Cancelled),
        other => Err(StoreError::Serialization(format!(
            "unknown pending status '{other}'"
        ))),
    }
}

fn kind_from_str(s: &str) -> Result<TransactionKind, StoreError> {
    match s {
        "purchase" => Ok(TransactionKind::Purchase),
        "issue" => Ok(TransactionKind::Issue),
        "return" => Ok(TransactionKind::Return),
        "adjustment" => Ok(TransactionKind::Adjustment),
        "sale" => Ok(TransactionKind::Sale),
        other => Err(StoreError::Serialization(format!(
            "unknown transaction kind '{other}'"
        ))),
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            if let Some(code) = db_err.code() {
                if code.as_ref() == "23505" {
                    return StoreError::Conflict(msg);
                }
            }
            StoreError::Backend(msg)
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        _ => StoreError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

// SQLx row types

#[derive(Debug)]
struct SnapshotRow {
    component_id: uuid::Uuid,
    quantity_on_hand: i64,
    reorder_level: i64,
    location: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for SnapshotRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(SnapshotRow {
            component_id: row.try_get("component_id")?,
            quantity_on_hand: row.try_get("quantity_on_hand")?,
            reorder_level: row.try_get("reorder_level")?,
            location: row.try_get("location")?,
        })
    }
}

impl From<SnapshotRow> for InventorySnapshot {
    fn from(row: SnapshotRow) -> Self {
        InventorySnapshot {
            component_id: ComponentId::from_uuid(row.component_id),
            quantity_on_hand: row.quantity_on_hand,
            reorder_level: row.reorder_level,
            location: row.location,
        }
    }
}

#[derive(Debug)]
struct TransactionRow {
    id: uuid::Uuid,
    component_id: uuid::Uuid,
    quantity: i64,
    kind: String,
    occurred_at: DateTime<Utc>,
    balance_after: i64,
    sales_order_id: Option<uuid::Uuid>,
    purchase_order_id: Option<uuid::Uuid>,
    staff_id: Option<uuid::Uuid>,
    acting_user_id: Option<uuid::Uuid>,
    reason: Option<String>,
    external_reference: Option<String>,
    issue_category: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for TransactionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(TransactionRow {
            id: row.try_get("id")?,
            component_id: row.try_get("component_id")?,
            quantity: row.try_get("quantity")?,
            kind: row.try_get("kind")?,
            occurred_at: row.try_get("occurred_at")?,
            balance_after: row.try_get("balance_after")?,
            sales_order_id: row.try_get("sales_order_id")?,
            purchase_order_id: row.try_get("purchase_order_id")?,
            staff_id: row.try_get("staff_id")?,
            acting_user_id: row.try_get("acting_user_id")?,
            reason: row.try_get("reason")?,
            external_reference: row.try_get("external_reference")?,
            issue_category: row.try_get("issue_category")?,
        })
    }
}

impl TryFrom<TransactionRow> for InventoryTransaction {
    type Error = StoreError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(InventoryTransaction {
            id: TransactionId::from_uuid(row.id),
            component_id: ComponentId::from_uuid(row.component_id),
            quantity: row.quantity,
            kind: kind_from_str(&row.kind)?,
            occurred_at: row.occurred_at,
            balance_after: row.balance_after,
            sales_order_id: row.sales_order_id.map(SalesOrderId::from_uuid),
            purchase_order_id: row.purchase_order_id.map(PurchaseOrderId::from_uuid),
            staff_id: row.staff_id.map(StaffId::from_uuid),
            acting_user_id: row.acting_user_id.map(UserId::from_uuid),
            reason: row.reason,
            external_reference: row.external_reference,
            issue_category: row.issue_category,
        })
    }
}

#[derive(Debug)]
struct PendingRow {
    id: uuid::Uuid,
    external_reference: String,
    issue_category: Option<String>,
    staff_id: Option<uuid::Uuid>,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for PendingRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(PendingRow {
            id: row.try_get("id")?,
            external_reference: row.try_get("external_reference")?,
            issue_category: row.try_get("issue_category")?,
            staff_id: row.try_get("staff_id")?,
            notes: row.try_get("notes")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl PendingRow {
    fn into_pending(self, items: Vec<PendingItem>) -> Result<PendingIssuance, StoreError> {
        Ok(PendingIssuance::from_parts(
            PendingIssuanceId::from_uuid(self.id),
            self.external_reference,
            self.issue_category,
            self.staff_id.map(StaffId::from_uuid),
            self.notes,
            status_from_str(&self.status)?,
            self.created_at,
            items,
        ))
    }
}

#[derive(Debug)]
struct PendingItemRow {
    component_id: uuid::Uuid,
    quantity: i64,
    transaction_id: Option<uuid::Uuid>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for PendingItemRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(PendingItemRow {
            component_id: row.try_get("component_id")?,
            quantity: row.try_get("quantity")?,
            transaction_id: row.try_get("transaction_id")?,
        })
    }
}

impl From<PendingItemRow> for PendingItem {
    fn from(row: PendingItemRow) -> Self {
        PendingItem {
            component_id: ComponentId::from_uuid(row.component_id),
            quantity: row.quantity,
            transaction_id: row.transaction_id.map(TransactionId::from_uuid),
        }
    }
}

// Implement the synchronous StockStore trait via the runtime handle, the
// same bridge the rest of the codebase uses for Postgres-backed traits.

fn runtime_handle() -> Result<tokio::runtime::Handle, StoreError> {
    tokio::runtime::Handle::try_current().map_err(|_| {
        StoreError::Backend(
            "PostgresStockStore requires an async runtime (tokio); call from within a tokio runtime context".to_string(),
        )
    })
}

impl StockStore for PostgresStockStore {
    fn snapshot(&self, component_id: ComponentId) -> Result<Option<InventorySnapshot>, StoreError> {
        runtime_handle()?.block_on(self.snapshot_async(component_id))
    }

    fn create_snapshot(&self, snapshot: InventorySnapshot) -> Result<InventorySnapshot, StoreError> {
        runtime_handle()?.block_on(self.create_snapshot_async(snapshot))
    }

    fn commit(&self, draft: TransactionDraft) -> Result<CommittedMutation, StoreError> {
        runtime_handle()?.block_on(self.commit_async(draft))
    }

    fn list_recent(
        &self,
        component_id: ComponentId,
        limit: usize,
    ) -> Result<Vec<InventoryTransaction>, StoreError> {
        runtime_handle()?.block_on(self.list_recent_async(component_id, limit))
    }

    fn find_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<InventoryTransaction>, StoreError> {
        runtime_handle()?.block_on(self.find_transaction_async(transaction_id))
    }

    fn insert_pending(&self, list: &PendingIssuance) -> Result<(), StoreError> {
        runtime_handle()?.block_on(self.insert_pending_async(list))
    }

    fn fetch_pending(
        &self,
        pending_id: PendingIssuanceId,
    ) -> Result<Option<PendingIssuance>, StoreError> {
        runtime_handle()?.block_on(self.fetch_pending_async(pending_id))
    }

    fn update_pending(&self, list: &PendingIssuance) -> Result<(), StoreError> {
        runtime_handle()?.block_on(self.update_pending_async(list))
    }
}
