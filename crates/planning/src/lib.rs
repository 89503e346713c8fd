//! Read-only demand/supply aggregation for stock planning.
//!
//! Answers two questions about a component without touching the ledger:
//! how much is on order with suppliers, and how much active production will
//! consume. Purchasing and production data come in through reader traits;
//! in-memory readers are provided for tests and embedding.

pub mod orders;
pub mod readers;
pub mod requirements;

pub use orders::{BomLine, PurchaseLine, PurchaseOrderStatus, SalesLine, SalesOrderStatus};
pub use readers::{
    InMemoryProductionReader, InMemoryPurchaseOrderReader, ProductionReader, PurchaseOrderReader,
};
pub use requirements::RequirementAggregator;
