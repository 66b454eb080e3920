//! Summary metrics over a product collection.

use serde::{Deserialize, Serialize};

use shrinkwatch_inventory::Product;

use crate::discrepancy::{DiscrepancyBatch, compute_batch, compute_discrepancy};
use crate::error::ReconciliationError;
use crate::model::{DiscrepancyResult, FailedProduct, InventoryMetrics};

/// Best-effort summary: metrics over valid products plus the ones left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub metrics: InventoryMetrics,
    pub failed_products: Vec<FailedProduct>,
}

/// Summarize products, excluding (and listing) any whose counters are invalid.
pub fn summarize(products: &[Product]) -> BatchSummary {
    let mut batch = compute_batch(products);
    let metrics = fold_batch(&mut batch);
    BatchSummary {
        metrics,
        failed_products: batch.failed,
    }
}

/// All-or-nothing summary: the first invalid product fails the whole call.
pub fn summarize_strict(products: &[Product]) -> Result<InventoryMetrics, ReconciliationError> {
    let evaluated = products
        .iter()
        .map(|p| compute_discrepancy(p).map(|r| (p, r)))
        .collect::<Result<Vec<_>, _>>()?;
    fold_metrics(evaluated.iter().map(|(p, r)| (*p, r)))
}

/// Fold already-computed results into metrics.
///
/// Every figure comes from the `DiscrepancyResult`, so summary cards and
/// detail rows can never disagree. Totals that leave the numeric range fail
/// with [`ReconciliationError::InvalidProductData`] for the product that
/// pushed them over.
pub fn fold_metrics<'a>(
    evaluated: impl IntoIterator<Item = (&'a Product, &'a DiscrepancyResult)>,
) -> Result<InventoryMetrics, ReconciliationError> {
    evaluated
        .into_iter()
        .try_fold(InventoryMetrics::default(), |m, (product, result)| accumulate(&m, product, result))
}

/// Best-effort fold over a batch.
///
/// A product whose contribution would overflow a total is moved from
/// `evaluated` to `failed` (after the products that failed computation), so
/// the batch stays consistent with the returned metrics.
pub fn fold_batch(batch: &mut DiscrepancyBatch<'_>) -> InventoryMetrics {
    let mut metrics = InventoryMetrics::default();
    let mut overflowed = Vec::new();

    batch
        .evaluated
        .retain(|(product, result)| match accumulate(&metrics, product, result) {
            Ok(next) => {
                metrics = next;
                true
            }
            Err(err) => {
                overflowed.push(FailedProduct::new(product.id.clone(), &err));
                false
            }
        });

    batch.failed.extend(overflowed);
    metrics
}

fn accumulate(
    m: &InventoryMetrics,
    product: &Product,
    result: &DiscrepancyResult,
) -> Result<InventoryMetrics, ReconciliationError> {
    let overflow = |what: &str| ReconciliationError::invalid_data(&product.id, format!("{what} exceeds numeric range"));

    let mut next = InventoryMetrics {
        total_items: m.total_items.checked_add(1).ok_or_else(|| overflow("item count"))?,
        remaining_items: m
            .remaining_items
            .checked_add(product.actual_remaining)
            .ok_or_else(|| overflow("remaining item total"))?,
        sold_items: m.sold_items.checked_add(product.sold).ok_or_else(|| overflow("sold item total"))?,
        ..m.clone()
    };

    if result.is_shrinkage() {
        next.discrepancy_count += 1;
        next.total_financial_loss = m
            .total_financial_loss
            .checked_add(result.loss)
            .ok_or_else(|| overflow("financial loss total"))?;
    }

    Ok(next)
}
