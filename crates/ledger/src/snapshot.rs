use serde::{Deserialize, Serialize};

use millstock_core::ComponentId;

/// Materialized current quantity-on-hand for one component.
///
/// Kept consistent with the ledger: at any quiescent point
/// `quantity_on_hand` equals the sum of the component's transaction deltas.
/// Negative quantities are a valid state (untracked/back-ordered stock),
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub component_id: ComponentId,
    pub quantity_on_hand: i64,
    pub reorder_level: i64,
    pub location: Option<String>,
}

impl InventorySnapshot {
    /// Zero snapshot, as created lazily the first time a component needs
    /// tracking.
    pub fn zero(component_id: ComponentId) -> Self {
        Self {
            component_id,
            quantity_on_hand: 0,
            reorder_level: 0,
            location: None,
        }
    }

    pub fn with_quantity(component_id: ComponentId, quantity_on_hand: i64) -> Self {
        Self {
            component_id,
            quantity_on_hand,
            reorder_level: 0,
            location: None,
        }
    }

    /// True when on-hand stock has fallen to or below the reorder level.
    pub fn needs_reorder(&self) -> bool {
        self.quantity_on_hand <= self.reorder_level
    }
}
