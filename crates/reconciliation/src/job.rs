use chrono::{DateTime, Utc};
use tracing::{info, warn};

use shrinkwatch_core::{InventoryId, ReportId};

use crate::config::{ErrorPolicy, ReconciliationConfig};
use crate::discrepancy::compute_batch;
use crate::error::ReconciliationError;
use crate::reconciler::{OccurrenceMode, reconcile_at};
use crate::report::InventoryReport;
use crate::source::InventorySource;
use crate::summary::{fold_batch, summarize_strict};

/// One reconciliation pass over a single inventory.
///
/// Jobs are independent: they read their snapshot from an [`InventorySource`]
/// and never observe another job's outcome, so any number may run in parallel.
#[derive(Debug, Clone)]
pub struct ReconciliationJob {
    inventory_id: InventoryId,
    config: ReconciliationConfig,
    /// Fixed detection time; `None` uses the clock at run time.
    detected_at: Option<DateTime<Utc>>,
}

impl ReconciliationJob {
    pub fn new(inventory_id: impl Into<InventoryId>) -> Self {
        Self {
            inventory_id: inventory_id.into(),
            config: ReconciliationConfig::default(),
            detected_at: None,
        }
    }

    pub fn with_config(mut self, config: ReconciliationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_occurrence_mode(mut self, mode: OccurrenceMode) -> Self {
        self.config.occurrence_mode = mode;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    pub fn with_detected_at(mut self, detected_at: DateTime<Utc>) -> Self {
        self.detected_at = Some(detected_at);
        self
    }

    pub fn inventory_id(&self) -> &InventoryId {
        &self.inventory_id
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Fetch the snapshot, reconcile scans, and summarize.
    ///
    /// Under [`ErrorPolicy::AllOrNothing`] the first invalid product fails the
    /// job; otherwise invalid products are listed in the report.
    pub fn run<S: InventorySource + ?Sized>(&self, source: &S) -> Result<InventoryReport, ReconciliationError> {
        let products = source.products(&self.inventory_id)?;
        let scans = source.scan_events(&self.inventory_id)?;
        let generated_at = self.detected_at.unwrap_or_else(Utc::now);

        if self.config.error_policy == ErrorPolicy::AllOrNothing {
            summarize_strict(&products)?;
        }

        let mut batch = compute_batch(&products);
        let metrics = fold_batch(&mut batch);
        let discrepancies = batch.results().cloned().collect();
        let theft = reconcile_at(&products, &scans, generated_at, self.config.occurrence_mode);

        for failed in &batch.failed {
            warn!(
                inventory = %self.inventory_id,
                product = %failed.product_id,
                reason = %failed.reason,
                "product excluded from reconciliation"
            );
        }
        for unmatched in &theft.unmatched_scans {
            warn!(
                inventory = %self.inventory_id,
                product = %unmatched.product_id,
                scanned_at = %unmatched.scanned_at,
                "unsold scan references unknown product; skipped"
            );
        }
        if theft.has_theft {
            info!(
                inventory = %self.inventory_id,
                occurrences = theft.occurrences.len(),
                loss = %metrics.total_financial_loss_rounded(),
                "theft detected"
            );
        }

        Ok(InventoryReport {
            report_id: ReportId::new(),
            inventory_id: self.inventory_id.clone(),
            generated_at,
            config: self.config,
            metrics,
            discrepancies,
            theft,
            failed_products: batch.failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use shrinkwatch_inventory::{Product, ScanEvent, ScanStatus};

    use crate::source::InMemoryInventorySource;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 6, 9, 0, 0).unwrap()
    }

    fn source() -> InMemoryInventorySource {
        let scanned = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        InMemoryInventorySource::new(
            vec![
                Product::new("prod1", "inv1", "Pen")
                    .with_counts(100, 15, 80)
                    .with_price(dec!(10)),
                Product::new("bad", "inv1", "Broken").with_counts(100, 120, 0),
                Product::new("prod4", "inv2", "Eraser")
                    .with_counts(300, 50, 200)
                    .with_price(dec!(2)),
            ],
            vec![
                ScanEvent::new("prod1", "Pen", scanned, ScanStatus::Unsold, "inv1"),
                ScanEvent::new("ghost", "Ghost", scanned, ScanStatus::Unsold, "inv1"),
                ScanEvent::new("prod4", "Eraser", scanned, ScanStatus::Unsold, "inv2"),
            ],
        )
    }

    #[test]
    fn best_effort_job_reports_partial_results() {
        let report = ReconciliationJob::new("inv1")
            .with_detected_at(now())
            .run(&source())
            .unwrap();

        assert_eq!(report.inventory_id, InventoryId::new("inv1"));
        assert_eq!(report.generated_at, now());
        assert_eq!(report.metrics.total_items, 1);
        assert_eq!(report.metrics.total_financial_loss, dec!(50));
        assert_eq!(report.discrepancies.len(), 1);
        assert_eq!(report.failed_products.len(), 1);
        assert!(report.theft.has_theft);
        assert_eq!(report.theft.unmatched_scans.len(), 1);
        assert!(!report.is_clean());
        assert!(report.headline().contains("theft detected for 1 item(s)"));
    }

    #[test]
    fn headline_counts_products_not_scans() {
        let scanned = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        let source = InMemoryInventorySource::new(
            vec![
                Product::new("prod1", "inv1", "Pen")
                    .with_counts(100, 15, 80)
                    .with_price(dec!(10)),
            ],
            vec![
                ScanEvent::new("prod1", "Pen", scanned, ScanStatus::Unsold, "inv1"),
                ScanEvent::new("prod1", "Pen", scanned, ScanStatus::Unsold, "inv1"),
            ],
        );

        let report = ReconciliationJob::new("inv1")
            .with_detected_at(now())
            .run(&source)
            .unwrap();

        assert_eq!(report.theft.occurrences.len(), 2);
        assert_eq!(report.theft_item_count(), 1);
        assert!(report.headline().starts_with("theft detected for 1 item(s) in inv1"));
    }

    #[test]
    fn all_or_nothing_job_fails_on_invalid_product() {
        let err = ReconciliationJob::new("inv1")
            .with_error_policy(ErrorPolicy::AllOrNothing)
            .run(&source())
            .unwrap_err();
        assert!(matches!(err, ReconciliationError::InvalidProductState { .. }));
    }

    #[test]
    fn jobs_only_see_their_inventory() {
        let report = ReconciliationJob::new("inv2")
            .with_detected_at(now())
            .with_error_policy(ErrorPolicy::AllOrNothing)
            .run(&source())
            .unwrap();

        assert_eq!(report.metrics.total_items, 1);
        assert!(report.theft.has_theft);
        assert_eq!(report.theft.occurrences[0].loss, dec!(100));
        assert!(report.is_clean());
    }
}
