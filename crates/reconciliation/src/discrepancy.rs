//! Per-product discrepancy arithmetic.

use rust_decimal::Decimal;
use tracing::debug;

use shrinkwatch_inventory::Product;

use crate::error::ReconciliationError;
use crate::model::{DiscrepancyResult, FailedProduct};

/// Compute expected remaining, discrepancy and loss for a single product.
///
/// Fails with [`ReconciliationError::InvalidProductState`] when `sold > total`;
/// the value is never clamped.
pub fn compute_discrepancy(product: &Product) -> Result<DiscrepancyResult, ReconciliationError> {
    let expected_remaining =
        product
            .expected_remaining()
            .ok_or_else(|| ReconciliationError::InvalidProductState {
                product_id: product.id.clone(),
                total: product.total,
                sold: product.sold,
            })?;

    product
        .validate()
        .map_err(|e| ReconciliationError::invalid_data(&product.id, e.to_string()))?;

    let discrepancy = i64::try_from(i128::from(expected_remaining) - i128::from(product.actual_remaining))
        .map_err(|_| ReconciliationError::invalid_data(&product.id, "discrepancy exceeds i64 range"))?;

    let loss = if discrepancy > 0 {
        Decimal::from(discrepancy)
            .checked_mul(product.price)
            .ok_or_else(|| ReconciliationError::invalid_data(&product.id, "loss exceeds decimal range"))?
    } else {
        Decimal::ZERO
    };

    debug!(product = %product.id, expected_remaining, discrepancy, %loss, "computed discrepancy");

    Ok(DiscrepancyResult {
        product_id: product.id.clone(),
        expected_remaining,
        discrepancy,
        loss,
    })
}

/// Best-effort evaluation of a product collection.
#[derive(Debug, Clone, Default)]
pub struct DiscrepancyBatch<'a> {
    /// Products whose computation succeeded, in input order.
    pub evaluated: Vec<(&'a Product, DiscrepancyResult)>,
    /// Products whose computation failed, in input order.
    pub failed: Vec<FailedProduct>,
}

impl<'a> DiscrepancyBatch<'a> {
    pub fn results(&self) -> impl Iterator<Item = &DiscrepancyResult> {
        self.evaluated.iter().map(|(_, r)| r)
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compute every product's discrepancy; a failing product never aborts the rest.
pub fn compute_batch(products: &[Product]) -> DiscrepancyBatch<'_> {
    let mut batch = DiscrepancyBatch {
        evaluated: Vec::with_capacity(products.len()),
        failed: Vec::new(),
    };

    for product in products {
        match compute_discrepancy(product) {
            Ok(result) => batch.evaluated.push((product, result)),
            Err(err) => batch.failed.push(FailedProduct::new(product.id.clone(), &err)),
        }
    }

    batch
}
