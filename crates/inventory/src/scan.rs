use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shrinkwatch_core::{InventoryId, ProductId};

/// What the RFID reader observed for a tagged unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanStatus {
    Sold,
    Unsold,
}

/// A single RFID shelf-scan observation.
///
/// Each event is independent; several events may reference the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub product_id: ProductId,
    /// Denormalized for display only; never used for matching.
    #[serde(default)]
    pub product_name: String,
    pub scanned_at: DateTime<Utc>,
    pub status: ScanStatus,
    pub inventory_id: InventoryId,
}

impl ScanEvent {
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        scanned_at: DateTime<Utc>,
        status: ScanStatus,
        inventory_id: impl Into<InventoryId>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            scanned_at,
            status,
            inventory_id: inventory_id.into(),
        }
    }

    pub fn is_unsold(&self) -> bool {
        self.status == ScanStatus::Unsold
    }
}
