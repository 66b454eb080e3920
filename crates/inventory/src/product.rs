use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shrinkwatch_core::{DomainError, DomainResult, Entity, InventoryId, ProductId, SupplierId};

/// A product's lifecycle counters as reported by the inventory backend.
///
/// Counters are unsigned, so a negative count cannot be represented and is
/// rejected at deserialization instead of being coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    /// Units ever received.
    pub total: u64,
    /// Units sold (must not exceed `total`).
    pub sold: u64,
    /// Units physically counted on shelf / in storage.
    #[serde(alias = "actual_remaining")]
    pub actual_remaining: u64,
    /// Unit price used for loss valuation. Must be a JSON number; quoted
    /// strings are rejected rather than coerced.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<SupplierId>,
    pub inventory_id: InventoryId,
}

impl Product {
    /// Create a product with zeroed counters and price.
    pub fn new(
        id: impl Into<ProductId>,
        inventory_id: impl Into<InventoryId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total: 0,
            sold: 0,
            actual_remaining: 0,
            price: Decimal::ZERO,
            rfid: None,
            supplier_id: None,
            inventory_id: inventory_id.into(),
        }
    }

    pub fn with_counts(mut self, total: u64, sold: u64, actual_remaining: u64) -> Self {
        self.total = total;
        self.sold = sold;
        self.actual_remaining = actual_remaining;
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn with_rfid(mut self, rfid: impl Into<String>) -> Self {
        self.rfid = Some(rfid.into());
        self
    }

    pub fn with_supplier(mut self, supplier_id: impl Into<SupplierId>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }

    /// Units that should be on hand absent loss (`total - sold`).
    ///
    /// `None` when `sold > total`, which means the upstream counters are corrupt.
    pub fn expected_remaining(&self) -> Option<u64> {
        self.total.checked_sub(self.sold)
    }

    /// Boundary validation for fields the type system cannot constrain.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::invalid_id("product id cannot be empty"));
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "price cannot be negative (got {})",
                self.price
            )));
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
