use rayon::prelude::*;

use shrinkwatch_core::InventoryId;

use crate::error::ReconciliationError;
use crate::job::ReconciliationJob;
use crate::report::InventoryReport;
use crate::source::InventorySource;

/// Inventory scope for execution.
///
/// - `Any`: run jobs for any inventory (shared workers).
/// - `Inventory`: only accept jobs for the specified inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryScope {
    Any,
    Inventory(InventoryId),
}

impl InventoryScope {
    pub fn allows(&self, inventory_id: &InventoryId) -> bool {
        match self {
            InventoryScope::Any => true,
            InventoryScope::Inventory(id) => id == inventory_id,
        }
    }
}

/// Runs reconciliation jobs against a source.
pub trait ReconciliationScheduler: Send + Sync {
    fn scope(&self) -> &InventoryScope;

    fn run<S: InventorySource + ?Sized>(
        &self,
        job: &ReconciliationJob,
        source: &S,
    ) -> Result<InventoryReport, ReconciliationError> {
        if !self.scope().allows(job.inventory_id()) {
            return Err(ReconciliationError::ScopeViolation(format!(
                "job inventory {} not allowed by scheduler",
                job.inventory_id()
            )));
        }
        job.run(source)
    }
}

/// Synchronous in-process scheduler.
#[derive(Debug, Clone)]
pub struct LocalScheduler {
    scope: InventoryScope,
}

impl LocalScheduler {
    pub fn new(scope: InventoryScope) -> Self {
        Self { scope }
    }

    pub fn for_inventory(inventory_id: impl Into<InventoryId>) -> Self {
        Self::new(InventoryScope::Inventory(inventory_id.into()))
    }

    /// Run independent jobs on the rayon pool; results keep the job order.
    pub fn run_all<S: InventorySource + ?Sized>(
        &self,
        jobs: &[ReconciliationJob],
        source: &S,
    ) -> Vec<Result<InventoryReport, ReconciliationError>> {
        jobs.par_iter().map(|job| self.run(job, source)).collect()
    }
}

impl ReconciliationScheduler for LocalScheduler {
    fn scope(&self) -> &InventoryScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use shrinkwatch_inventory::{Product, ScanEvent, ScanStatus};

    use crate::source::InMemoryInventorySource;

    fn source() -> InMemoryInventorySource {
        let at = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        InMemoryInventorySource::new(
            vec![
                Product::new("prod1", "inv1", "Pen")
                    .with_counts(100, 15, 80)
                    .with_price(dec!(10)),
                Product::new("prod3", "inv2", "Notebook")
                    .with_counts(150, 10, 140)
                    .with_price(dec!(50)),
            ],
            vec![ScanEvent::new("prod1", "Pen", at, ScanStatus::Unsold, "inv1")],
        )
    }

    #[test]
    fn scoped_scheduler_rejects_foreign_inventory() {
        let scheduler = LocalScheduler::for_inventory("inv1");
        let err = scheduler
            .run(&ReconciliationJob::new("inv2"), &source())
            .unwrap_err();
        assert!(matches!(err, ReconciliationError::ScopeViolation(_)));

        assert!(scheduler.run(&ReconciliationJob::new("inv1"), &source()).is_ok());
    }

    #[test]
    fn run_all_preserves_job_order() {
        let scheduler = LocalScheduler::new(InventoryScope::Any);
        let jobs = vec![ReconciliationJob::new("inv2"), ReconciliationJob::new("inv1")];

        let reports = scheduler.run_all(&jobs, &source());
        assert_eq!(reports.len(), 2);

        let first = reports[0].as_ref().unwrap();
        let second = reports[1].as_ref().unwrap();
        assert_eq!(first.inventory_id, InventoryId::new("inv2"));
        assert_eq!(first.metrics.discrepancy_count, 0);
        assert_eq!(second.inventory_id, InventoryId::new("inv1"));
        assert!(second.theft.has_theft);
    }

    #[test]
    fn run_all_handles_more_jobs_than_pool_threads() {
        let scheduler = LocalScheduler::new(InventoryScope::Any);
        let jobs: Vec<ReconciliationJob> = (0..256)
            .map(|i| ReconciliationJob::new(if i % 2 == 0 { "inv1" } else { "inv2" }))
            .collect();

        let reports = scheduler.run_all(&jobs, &source());
        assert_eq!(reports.len(), 256);
        for (i, report) in reports.iter().enumerate() {
            let report = report.as_ref().unwrap();
            assert_eq!(report.inventory_id, *jobs[i].inventory_id());
            assert_eq!(report.theft.has_theft, i % 2 == 0);
        }
    }

    #[test]
    fn run_all_reports_scope_violations_per_job() {
        let scheduler = LocalScheduler::for_inventory("inv1");
        let jobs = vec![ReconciliationJob::new("inv1"), ReconciliationJob::new("inv2")];

        let reports = scheduler.run_all(&jobs, &source());
        assert!(reports[0].is_ok());
        assert!(matches!(reports[1], Err(ReconciliationError::ScopeViolation(_))));
    }
}
