//! `shrinkwatch-reconciliation`
//!
//! **Responsibility:** inventory reconciliation and shrinkage detection.
//!
//! Given a snapshot of product lifecycle counters and RFID shelf-scan events,
//! this crate works out whether stock is missing, how much, and what it is
//! worth:
//! - [`compute_discrepancy`]: per-product expected remaining, discrepancy, loss.
//! - [`reconcile`]: unsold scans cross-referenced against discrepancies.
//! - [`summarize`] / [`filter`]: dashboard metrics and reporting windows.
//!
//! Everything here is a pure function of its inputs: no IO, no shared state.
//! Records are owned by the caller and reached through [`InventorySource`].

pub mod config;
pub mod discrepancy;
pub mod error;
pub mod filter;
pub mod job;
pub mod listing;
pub mod model;
pub mod reconciler;
pub mod report;
pub mod scheduler;
pub mod source;
pub mod summary;
pub mod transfer;

pub use config::{ErrorPolicy, ReconciliationConfig};
pub use discrepancy::{DiscrepancyBatch, compute_batch, compute_discrepancy};
pub use error::ReconciliationError;
pub use filter::{FilterCriteria, ReportRecord, filter};
pub use job::ReconciliationJob;
pub use listing::{SortDirection, SortKey, discrepancy_records, search_products, sort_products};
pub use model::{
    DiscrepancyRecord, DiscrepancyResult, FailedProduct, InventoryMetrics, TheftOccurrence, UnmatchedScan,
    round_currency,
};
pub use reconciler::{OccurrenceMode, ReconciliationOutcome, reconcile, reconcile_at};
pub use report::InventoryReport;
pub use scheduler::{InventoryScope, LocalScheduler, ReconciliationScheduler};
pub use source::{InMemoryInventorySource, InventorySnapshot, InventorySource};
pub use summary::{BatchSummary, fold_batch, fold_metrics, summarize, summarize_strict};
pub use transfer::{TransferAudit, TransferCount, TransferStage, audit_shelf_sales, audit_transfer};
