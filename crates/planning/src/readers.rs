//! Reader traits over the purchasing and production collaborators, plus
//! in-memory implementations backed by plain maps.

use std::collections::HashMap;
use std::sync::RwLock;

use millstock_core::{ComponentId, DomainError, ProductId};

use crate::orders::{BomLine, PurchaseLine, SalesLine};

/// Read access to purchase-order lines.
pub trait PurchaseOrderReader: Send + Sync {
    /// All purchase-order lines for a component, any status.
    fn lines_for_component(
        &self,
        component_id: ComponentId,
    ) -> Result<Vec<PurchaseLine>, DomainError>;
}

/// Read access to sales/production orders and bills of materials.
pub trait ProductionReader: Send + Sync {
    /// Every sales-order line, any status. Status filtering happens in the
    /// aggregator so the reader stays a dumb projection.
    fn sales_lines(&self) -> Result<Vec<SalesLine>, DomainError>;

    /// The product's bill of materials, single level. Empty when the product
    /// has no BOM.
    fn bom_for_product(&self, product_id: ProductId) -> Result<Vec<BomLine>, DomainError>;
}

fn poisoned() -> DomainError {
    DomainError::invariant("reader lock poisoned")
}

/// Vec-backed purchase-order reader.
#[derive(Debug, Default)]
pub struct InMemoryPurchaseOrderReader {
    lines: RwLock<Vec<PurchaseLine>>,
}

impl InMemoryPurchaseOrderReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_line(&self, line: PurchaseLine) -> Result<(), DomainError> {
        self.lines.write().map_err(|_| poisoned())?.push(line);
        Ok(())
    }
}

impl PurchaseOrderReader for InMemoryPurchaseOrderReader {
    fn lines_for_component(
        &self,
        component_id: ComponentId,
    ) -> Result<Vec<PurchaseLine>, DomainError> {
        let lines = self.lines.read().map_err(|_| poisoned())?;
        Ok(lines
            .iter()
            .filter(|line| line.component_id == component_id)
            .cloned()
            .collect())
    }
}

/// Map-backed production reader.
#[derive(Debug, Default)]
pub struct InMemoryProductionReader {
    inner: RwLock<ProductionData>,
}

#[derive(Debug, Default)]
struct ProductionData {
    sales_lines: Vec<SalesLine>,
    boms: HashMap<ProductId, Vec<BomLine>>,
}

impl InMemoryProductionReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_sales_line(&self, line: SalesLine) -> Result<(), DomainError> {
        self.inner
            .write()
            .map_err(|_| poisoned())?
            .sales_lines
            .push(line);
        Ok(())
    }

    pub fn set_bom(&self, product_id: ProductId, lines: Vec<BomLine>) -> Result<(), DomainError> {
        self.inner
            .write()
            .map_err(|_| poisoned())?
            .boms
            .insert(product_id, lines);
        Ok(())
    }
}

impl ProductionReader for InMemoryProductionReader {
    fn sales_lines(&self) -> Result<Vec<SalesLine>, DomainError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.sales_lines.clone())
    }

    fn bom_for_product(&self, product_id: ProductId) -> Result<Vec<BomLine>, DomainError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.boms.get(&product_id).cloned().unwrap_or_default())
    }
}
