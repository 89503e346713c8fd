//! The requirement aggregator: inbound supply and production demand for a
//! component, computed on demand from the reader traits.

use tracing::instrument;

use millstock_core::{ComponentId, DomainError};

use crate::readers::{ProductionReader, PurchaseOrderReader};

/// Read-only aggregation over purchasing and production data.
#[derive(Debug)]
pub struct RequirementAggregator<P, R> {
    purchasing: P,
    production: R,
}

impl<P: PurchaseOrderReader, R: ProductionReader> RequirementAggregator<P, R> {
    pub fn new(purchasing: P, production: R) -> Self {
        Self {
            purchasing,
            production,
        }
    }

    /// Total quantity on order with suppliers: the sum of outstanding
    /// (ordered minus received, clamped at zero) over every purchase-order
    /// line whose order is still open. Zero when nothing is inbound.
    #[instrument(skip(self), fields(component_id = %component_id), err)]
    pub fn on_order_quantity(&self, component_id: ComponentId) -> Result<i64, DomainError> {
        let lines = self.purchasing.lines_for_component(component_id)?;
        Ok(lines
            .iter()
            .filter(|line| line.status.is_open())
            .map(|line| line.outstanding())
            .sum())
    }

    /// Total quantity active production will consume, expanding each ordered
    /// product through one BOM level.
    ///
    /// For every sales-order line whose order is neither completed nor
    /// cancelled, the component's per-unit requirement is multiplied by the
    /// line quantity and summed. `None` means no active demand; the total is
    /// never reported as `Some(0)`.
    #[instrument(skip(self), fields(component_id = %component_id), err)]
    pub fn required_for_production(
        &self,
        component_id: ComponentId,
    ) -> Result<Option<i64>, DomainError> {
        let mut total = 0i64;
        for line in self.production.sales_lines()? {
            if !line.status.is_active() {
                continue;
            }
            for bom_line in self.production.bom_for_product(line.product_id)? {
                if bom_line.component_id == component_id {
                    total += bom_line.quantity_per_unit * line.quantity;
                }
            }
        }
        Ok((total != 0).then_some(total))
    }
}
