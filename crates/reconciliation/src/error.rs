use chrono::NaiveDate;
use thiserror::Error;

use shrinkwatch_core::{DomainError, ProductId};

/// Errors raised by the reconciliation engine.
///
/// Product-level variants are fatal to that product's computation only;
/// batch operations collect them instead of aborting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconciliationError {
    /// `sold > total`: expected remaining would be negative.
    #[error("invalid product state for {product_id}: sold ({sold}) exceeds total ({total})")]
    InvalidProductState {
        product_id: ProductId,
        total: u64,
        sold: u64,
    },

    /// A product failed boundary validation (negative price, blank id, overflow).
    #[error("invalid product data for {product_id}: {reason}")]
    InvalidProductData { product_id: ProductId, reason: String },

    #[error("malformed criteria: date_start ({start}) is after date_end ({end})")]
    MalformedCriteria { start: NaiveDate, end: NaiveDate },

    #[error("inventory scope violation: {0}")]
    ScopeViolation(String),

    #[error("inventory source failed: {0}")]
    Source(String),
}

impl ReconciliationError {
    pub fn invalid_data(product_id: &ProductId, reason: impl Into<String>) -> Self {
        Self::InvalidProductData {
            product_id: product_id.clone(),
            reason: reason.into(),
        }
    }

    /// Product the error is attributed to, if it is a product-level error.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            Self::InvalidProductState { product_id, .. }
            | Self::InvalidProductData { product_id, .. } => Some(product_id),
            _ => None,
        }
    }
}

impl From<ReconciliationError> for DomainError {
    fn from(err: ReconciliationError) -> Self {
        match err {
            ReconciliationError::InvalidProductState { .. } => DomainError::invariant(err.to_string()),
            ReconciliationError::InvalidProductData { .. }
            | ReconciliationError::MalformedCriteria { .. } => DomainError::validation(err.to_string()),
            ReconciliationError::ScopeViolation(_) => DomainError::invariant(err.to_string()),
            ReconciliationError::Source(msg) => DomainError::unavailable(msg),
        }
    }
}
