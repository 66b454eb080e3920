//! Hand-off audits between supply-chain stages.
//!
//! Compares what one stage declared as sent with what the next stage
//! confirmed as received. Only the counts and product ids produced by the
//! receipt / sale workflows are consumed here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use shrinkwatch_core::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStage {
    SupplierToWarehouse,
    WarehouseToConsumer,
}

impl TransferStage {
    pub fn label(self) -> &'static str {
        match self {
            TransferStage::SupplierToWarehouse => "Supplier to Warehouse",
            TransferStage::WarehouseToConsumer => "Warehouse to Consumer",
        }
    }
}

/// Declared unit count plus the distinct products it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCount {
    pub total: u64,
    pub product_ids: BTreeSet<ProductId>,
}

impl TransferCount {
    pub fn new(total: u64, product_ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            total,
            product_ids: product_ids.into_iter().collect(),
        }
    }

    /// Count where every id stands for exactly one unit.
    pub fn from_ids(product_ids: impl IntoIterator<Item = ProductId>) -> Self {
        let product_ids: BTreeSet<ProductId> = product_ids.into_iter().collect();
        Self {
            total: product_ids.len() as u64,
            product_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferAudit {
    pub stage: TransferStage,
    pub total_sent: u64,
    pub total_received: u64,
    /// `total_sent - total_received`, saturating at the `i64` range.
    pub discrepancy: i64,
    pub theft_detected: bool,
    /// Sent but not received, sorted by id.
    pub missing_products: Vec<ProductId>,
}

pub fn audit_transfer(stage: TransferStage, sent: &TransferCount, received: &TransferCount) -> TransferAudit {
    let missing_products: Vec<ProductId> = sent
        .product_ids
        .difference(&received.product_ids)
        .cloned()
        .collect();

    let audit = TransferAudit {
        stage,
        total_sent: sent.total,
        total_received: received.total,
        discrepancy: signed_difference(sent.total, received.total),
        theft_detected: sent.total != received.total,
        missing_products,
    };

    debug!(
        stage = stage.label(),
        sent = audit.total_sent,
        received = audit.total_received,
        missing = audit.missing_products.len(),
        theft = audit.theft_detected,
        "audited transfer"
    );

    audit
}

/// Shelf-to-sale audit: every product placed on a shelf is expected to be
/// confirmed by a sale; shelf items with no matching sale are missing.
///
/// `shelf_product_ids` holds one entry per shelf row, so `total_sent` counts
/// rows while `total_received` counts distinct products confirmed sold.
pub fn audit_shelf_sales(
    shelf_product_ids: impl IntoIterator<Item = ProductId>,
    sold_product_ids: impl IntoIterator<Item = ProductId>,
) -> TransferAudit {
    let shelf_rows: Vec<ProductId> = shelf_product_ids.into_iter().collect();
    let sent = TransferCount::new(shelf_rows.len() as u64, shelf_rows);
    let sold: BTreeSet<ProductId> = sold_product_ids.into_iter().collect();
    let received = TransferCount::from_ids(sent.product_ids.intersection(&sold).cloned());
    audit_transfer(TransferStage::WarehouseToConsumer, &sent, &received)
}

fn signed_difference(a: u64, b: u64) -> i64 {
    let diff = i128::from(a) - i128::from(b);
    i64::try_from(diff).unwrap_or(if diff > 0 { i64::MAX } else { i64::MIN })
}
