use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shrinkwatch_core::{InventoryId, ReportId};

use crate::config::ReconciliationConfig;
use crate::model::{DiscrepancyResult, FailedProduct, InventoryMetrics};
use crate::reconciler::ReconciliationOutcome;

/// Everything a dashboard needs for one inventory, computed in one pass.
///
/// This is a derived view, not a stored record: running the same job on the
/// same snapshot at the same instant yields the same report (apart from
/// `report_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub report_id: ReportId,
    pub inventory_id: InventoryId,
    pub generated_at: DateTime<Utc>,
    pub config: ReconciliationConfig,
    pub metrics: InventoryMetrics,
    /// Detail rows backing `metrics`, in product input order.
    pub discrepancies: Vec<DiscrepancyResult>,
    pub theft: ReconciliationOutcome,
    /// Products excluded from `metrics` and `discrepancies`.
    pub failed_products: Vec<FailedProduct>,
}

impl InventoryReport {
    /// True when every product was evaluated and every unsold scan matched.
    pub fn is_clean(&self) -> bool {
        self.failed_products.is_empty() && self.theft.unmatched_scans.is_empty()
    }

    /// Distinct products with at least one theft occurrence.
    pub fn theft_item_count(&self) -> usize {
        self.theft
            .occurrences
            .iter()
            .map(|o| &o.product_id)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn headline(&self) -> String {
        if self.theft.has_theft {
            format!(
                "theft detected for {} item(s) in {}; estimated loss {}",
                self.theft_item_count(),
                self.inventory_id,
                self.metrics.total_financial_loss_rounded()
            )
        } else {
            format!("no theft detected in {}", self.inventory_id)
        }
    }
}
