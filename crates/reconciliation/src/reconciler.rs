//! Cross-reference RFID scan events against product discrepancies.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use shrinkwatch_core::ProductId;
use shrinkwatch_inventory::{Product, ScanEvent};

use crate::discrepancy::compute_discrepancy;
use crate::error::ReconciliationError;
use crate::model::{DiscrepancyResult, FailedProduct, TheftOccurrence, UnmatchedScan};

/// How many occurrences a product with several unsold scans produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceMode {
    /// One occurrence per qualifying unsold scan (dashboard behaviour).
    #[default]
    PerScan,
    /// At most one occurrence per under-stocked product, positioned at its
    /// first qualifying scan.
    PerProduct,
}

impl FromStr for OccurrenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_scan" | "perscan" | "scan" => Ok(Self::PerScan),
            "per_product" | "perproduct" | "product" => Ok(Self::PerProduct),
            other => Err(format!("unknown occurrence mode: {other}")),
        }
    }
}

/// Result of reconciling a scan log against a product snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationOutcome {
    pub has_theft: bool,
    /// In input scan order.
    pub occurrences: Vec<TheftOccurrence>,
    /// Unsold scans whose product is not in the snapshot (non-fatal).
    pub unmatched_scans: Vec<UnmatchedScan>,
    /// Matched products whose counters are invalid, once per product.
    pub failed_products: Vec<FailedProduct>,
}

impl ReconciliationOutcome {
    fn empty() -> Self {
        Self {
            has_theft: false,
            occurrences: Vec::new(),
            unmatched_scans: Vec::new(),
            failed_products: Vec::new(),
        }
    }
}

/// Reconcile using the current time and per-scan occurrences.
pub fn reconcile(products: &[Product], scans: &[ScanEvent]) -> ReconciliationOutcome {
    reconcile_at(products, scans, Utc::now(), OccurrenceMode::default())
}

/// Reconcile with an explicit detection time and occurrence mode.
///
/// Deterministic: identical inputs always yield an identical outcome.
pub fn reconcile_at(
    products: &[Product],
    scans: &[ScanEvent],
    detected_at: DateTime<Utc>,
    mode: OccurrenceMode,
) -> ReconciliationOutcome {
    // First product wins when ids repeat.
    let mut index: HashMap<&ProductId, &Product> = HashMap::with_capacity(products.len());
    for product in products {
        index.entry(&product.id).or_insert(product);
    }

    let mut computed: HashMap<&ProductId, Result<DiscrepancyResult, ReconciliationError>> = HashMap::new();
    let mut emitted: HashSet<&ProductId> = HashSet::new();
    let mut outcome = ReconciliationOutcome::empty();

    for (i, scan) in scans.iter().enumerate() {
        if !scan.is_unsold() {
            continue;
        }

        let Some(product) = index.get(&scan.product_id).copied() else {
            debug!(product = %scan.product_id, index = i, "unsold scan has no matching product");
            outcome.unmatched_scans.push(UnmatchedScan {
                index: i,
                product_id: scan.product_id.clone(),
                scanned_at: scan.scanned_at,
            });
            continue;
        };

        let result = computed.entry(&product.id).or_insert_with(|| {
            let r = compute_discrepancy(product);
            if let Err(err) = &r {
                outcome.failed_products.push(FailedProduct::new(product.id.clone(), err));
            }
            r
        });

        let Ok(result) = result else {
            continue;
        };

        if !result.is_shrinkage() {
            continue;
        }

        if mode == OccurrenceMode::PerProduct && !emitted.insert(&product.id) {
            continue;
        }

        outcome.occurrences.push(TheftOccurrence {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity_missing: result.quantity_missing(),
            loss: result.loss,
            detected_at,
        });
    }

    outcome.has_theft = !outcome.occurrences.is_empty();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use shrinkwatch_inventory::ScanStatus;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 6, 9, 0, 0).unwrap()
    }

    fn scan(product_id: &str, status: ScanStatus, minute: u32) -> ScanEvent {
        ScanEvent::new(
            product_id,
            product_id,
            Utc.with_ymd_and_hms(2025, 3, 5, 12, minute, 0).unwrap(),
            status,
            "inv1",
        )
    }

    fn shrinking(id: &str) -> Product {
        Product::new(id, "inv1", format!("{id}-name"))
            .with_counts(100, 15, 80)
            .with_price(dec!(10))
    }

    fn balanced(id: &str) -> Product {
        Product::new(id, "inv1", id)
            .with_counts(200, 20, 180)
            .with_price(dec!(5))
    }

    #[test]
    fn unsold_scan_on_shrinking_product_is_theft() {
        let outcome = reconcile_at(
            &[shrinking("p1")],
            &[scan("p1", ScanStatus::Unsold, 0)],
            now(),
            OccurrenceMode::PerScan,
        );

        assert!(outcome.has_theft);
        assert_eq!(outcome.occurrences.len(), 1);
        let occ = &outcome.occurrences[0];
        assert_eq!(occ.quantity_missing, 5);
        assert_eq!(occ.loss, dec!(50));
        assert_eq!(occ.product_name, "p1-name");
        assert_eq!(occ.detected_at, now());
    }

    #[test]
    fn unmatched_scan_is_reported_not_raised() {
        let outcome = reconcile_at(
            &[shrinking("p1")],
            &[scan("p9", ScanStatus::Unsold, 0)],
            now(),
            OccurrenceMode::PerScan,
        );

        assert!(!outcome.has_theft);
        assert!(outcome.occurrences.is_empty());
        assert_eq!(outcome.unmatched_scans.len(), 1);
        assert_eq!(outcome.unmatched_scans[0].product_id.as_str(), "p9");
    }

    #[test]
    fn sold_scans_are_ignored() {
        let outcome = reconcile_at(
            &[shrinking("p1")],
            &[scan("p1", ScanStatus::Sold, 0), scan("p9", ScanStatus::Sold, 1)],
            now(),
            OccurrenceMode::PerScan,
        );

        assert!(!outcome.has_theft);
        assert!(outcome.unmatched_scans.is_empty());
    }

    #[test]
    fn balanced_product_never_yields_occurrence() {
        let outcome = reconcile_at(
            &[balanced("p2")],
            &[scan("p2", ScanStatus::Unsold, 0)],
            now(),
            OccurrenceMode::PerScan,
        );
        assert!(!outcome.has_theft);
    }

    #[test]
    fn per_scan_mode_repeats_occurrences_in_scan_order() {
        let products = vec![shrinking("p1"), shrinking("p2")];
        let scans = vec![
            scan("p2", ScanStatus::Unsold, 0),
            scan("p1", ScanStatus::Unsold, 1),
            scan("p2", ScanStatus::Unsold, 2),
        ];

        let outcome = reconcile_at(&products, &scans, now(), OccurrenceMode::PerScan);
        let ids: Vec<&str> = outcome.occurrences.iter().map(|o| o.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1", "p2"]);
    }

    #[test]
    fn per_product_mode_deduplicates() {
        let products = vec![shrinking("p1"), shrinking("p2")];
        let scans = vec![
            scan("p2", ScanStatus::Unsold, 0),
            scan("p1", ScanStatus::Unsold, 1),
            scan("p2", ScanStatus::Unsold, 2),
        ];

        let outcome = reconcile_at(&products, &scans, now(), OccurrenceMode::PerProduct);
        let ids: Vec<&str> = outcome.occurrences.iter().map(|o| o.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[test]
    fn invalid_product_is_recorded_once_and_siblings_still_reconcile() {
        let bad = Product::new("bad", "inv1", "bad").with_counts(100, 120, 0);
        let products = vec![bad, shrinking("p1")];
        let scans = vec![
            scan("bad", ScanStatus::Unsold, 0),
            scan("p1", ScanStatus::Unsold, 1),
            scan("bad", ScanStatus::Unsold, 2),
        ];

        let outcome = reconcile_at(&products, &scans, now(), OccurrenceMode::PerScan);
        assert_eq!(outcome.failed_products.len(), 1);
        assert_eq!(outcome.failed_products[0].product_id.as_str(), "bad");
        assert_eq!(outcome.occurrences.len(), 1);
    }

    #[test]
    fn first_product_wins_on_duplicate_ids() {
        let first = shrinking("p1");
        let second = balanced("p1");
        let outcome = reconcile_at(
            &[first, second],
            &[scan("p1", ScanStatus::Unsold, 0)],
            now(),
            OccurrenceMode::PerScan,
        );
        assert!(outcome.has_theft);
    }

    #[test]
    fn reconciliation_is_deterministic() {
        let products = vec![shrinking("p1"), balanced("p2")];
        let scans = vec![scan("p1", ScanStatus::Unsold, 0), scan("p2", ScanStatus::Unsold, 1)];

        let a = reconcile_at(&products, &scans, now(), OccurrenceMode::PerScan);
        let b = reconcile_at(&products, &scans, now(), OccurrenceMode::PerScan);
        assert_eq!(a, b);
    }

    #[test]
    fn occurrence_mode_parses_config_values() {
        assert_eq!("per_product".parse::<OccurrenceMode>().unwrap(), OccurrenceMode::PerProduct);
        assert_eq!(" PER_SCAN ".parse::<OccurrenceMode>().unwrap(), OccurrenceMode::PerScan);
        assert!("sometimes".parse::<OccurrenceMode>().is_err());
    }
}
