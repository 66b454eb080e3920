//! Derived reconciliation records.
//!
//! None of these are persisted by the engine: they are recomputed on demand
//! from the current product + scan snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use shrinkwatch_core::{ProductId, ValueObject};

use crate::error::ReconciliationError;

/// Decimal places used when money leaves the engine for display.
pub const CURRENCY_PRECISION: u32 = 2;

/// Round a monetary amount for presentation.
///
/// Accumulation always happens on unrounded values; call this only at the edge.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-product reconciliation arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyResult {
    pub product_id: ProductId,
    pub expected_remaining: u64,
    /// `expected_remaining - actual_remaining`; negative means surplus.
    pub discrepancy: i64,
    /// Never negative; zero unless `discrepancy > 0`.
    pub loss: Decimal,
}

impl DiscrepancyResult {
    pub fn is_shrinkage(&self) -> bool {
        self.discrepancy > 0
    }

    pub fn is_surplus(&self) -> bool {
        self.discrepancy < 0
    }

    pub fn is_reconciled(&self) -> bool {
        self.discrepancy == 0
    }

    /// Units unaccounted for (zero for reconciled or surplus products).
    pub fn quantity_missing(&self) -> u64 {
        self.discrepancy.max(0).unsigned_abs()
    }

    pub fn loss_rounded(&self) -> Decimal {
        round_currency(self.loss)
    }
}

impl ValueObject for DiscrepancyResult {}

/// A product-level shrinkage flagged by an unsold scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheftOccurrence {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity_missing: u64,
    pub loss: Decimal,
    /// Time of reconciliation, not of the triggering scan.
    pub detected_at: DateTime<Utc>,
}

impl ValueObject for TheftOccurrence {}

/// Summary cards for a product collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetrics {
    pub total_items: usize,
    pub remaining_items: u64,
    pub sold_items: u64,
    pub discrepancy_count: usize,
    pub total_financial_loss: Decimal,
}

impl InventoryMetrics {
    pub fn total_financial_loss_rounded(&self) -> Decimal {
        round_currency(self.total_financial_loss)
    }
}

impl ValueObject for InventoryMetrics {}

/// Dated reporting row for discrepancy tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyRecord {
    pub date: NaiveDate,
    #[serde(alias = "itemId")]
    pub product_id: ProductId,
    #[serde(alias = "itemName")]
    pub product_name: String,
    pub discrepancy: i64,
    pub loss: Decimal,
}

impl ValueObject for DiscrepancyRecord {}

/// A product excluded from a batch because its computation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedProduct {
    pub product_id: ProductId,
    pub reason: String,
}

impl FailedProduct {
    pub fn new(product_id: ProductId, error: &ReconciliationError) -> Self {
        Self {
            product_id,
            reason: error.to_string(),
        }
    }
}

/// An unsold scan whose product is not part of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedScan {
    /// Position of the scan in the input log.
    pub index: usize,
    pub product_id: ProductId,
    pub scanned_at: DateTime<Utc>,
}
