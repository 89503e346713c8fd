//! Storage layer: the atomic ledger + snapshot boundary.
//!
//! Every stock mutation flows through [`StockStore::commit`], which applies
//! one ledger insert and one snapshot upsert as a single unit. Two
//! implementations: an in-memory store for tests/dev and a Postgres-backed
//! store using per-component row locks.

mod in_memory;
mod postgres;
mod r#trait;

pub use in_memory::InMemoryStockStore;
pub use postgres::PostgresStockStore;
pub use r#trait::{CommittedMutation, StockStore, StoreError};
