//! Order-line views exposed by the purchasing and production collaborators.

use serde::{Deserialize, Serialize};

use millstock_core::{ComponentId, ProductId, PurchaseOrderId, SalesOrderId};

/// Lifecycle state of a purchase order, as the purchasing system reports it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Open,
    InProgress,
    Approved,
    PartiallyReceived,
    PendingApproval,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Whether undelivered quantity on this order still counts as inbound.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Open
                | PurchaseOrderStatus::InProgress
                | PurchaseOrderStatus::Approved
                | PurchaseOrderStatus::PartiallyReceived
                | PurchaseOrderStatus::PendingApproval
        )
    }
}

/// One component line on a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub purchase_order_id: PurchaseOrderId,
    pub component_id: ComponentId,
    pub ordered: i64,
    pub received: i64,
    pub status: PurchaseOrderStatus,
}

impl PurchaseLine {
    /// Quantity still expected to arrive. Over-receipt clamps to zero rather
    /// than going negative.
    pub fn outstanding(&self) -> i64 {
        (self.ordered - self.received).max(0)
    }
}

/// Lifecycle state of a sales/production order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderStatus {
    Draft,
    Confirmed,
    InProduction,
    Completed,
    Cancelled,
}

impl SalesOrderStatus {
    /// Whether the order still drives component demand.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            SalesOrderStatus::Completed | SalesOrderStatus::Cancelled
        )
    }
}

/// One product line on a sales/production order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesLine {
    pub sales_order_id: SalesOrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub status: SalesOrderStatus,
}

/// One component requirement in a product's bill of materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    pub component_id: ComponentId,
    pub quantity_per_unit: i64,
}
