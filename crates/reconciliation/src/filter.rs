//! Date / product range filtering for reporting views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shrinkwatch_core::ProductId;
use shrinkwatch_inventory::ScanEvent;

use crate::error::ReconciliationError;
use crate::model::{DiscrepancyRecord, TheftOccurrence};

/// A record that can be placed on a reporting timeline.
pub trait ReportRecord {
    /// Calendar date the record is reported under (UTC).
    fn record_date(&self) -> NaiveDate;

    fn record_product_id(&self) -> &ProductId;
}

impl ReportRecord for DiscrepancyRecord {
    fn record_date(&self) -> NaiveDate {
        self.date
    }

    fn record_product_id(&self) -> &ProductId {
        &self.product_id
    }
}

impl ReportRecord for TheftOccurrence {
    fn record_date(&self) -> NaiveDate {
        self.detected_at.date_naive()
    }

    fn record_product_id(&self) -> &ProductId {
        &self.product_id
    }
}

impl ReportRecord for ScanEvent {
    fn record_date(&self) -> NaiveDate {
        self.scanned_at.date_naive()
    }

    fn record_product_id(&self) -> &ProductId {
        &self.product_id
    }
}

/// Filter criteria; every absent field is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Inclusive lower bound.
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    /// Inclusive upper bound.
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
    #[serde(default, alias = "itemId", alias = "product")]
    pub product_id: Option<ProductId>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.date_start = Some(date);
        self
    }

    pub fn until_date(mut self, date: NaiveDate) -> Self {
        self.date_end = Some(date);
        self
    }

    /// Single-day window.
    pub fn on_date(self, date: NaiveDate) -> Self {
        self.from_date(date).until_date(date)
    }

    pub fn for_product(mut self, product_id: impl Into<ProductId>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ReconciliationError> {
        match (self.date_start, self.date_end) {
            (Some(start), Some(end)) if start > end => {
                Err(ReconciliationError::MalformedCriteria { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn matches<R: ReportRecord + ?Sized>(&self, record: &R) -> bool {
        let date = record.record_date();
        self.date_start.is_none_or(|start| date >= start)
            && self.date_end.is_none_or(|end| date <= end)
            && self
                .product_id
                .as_ref()
                .is_none_or(|id| record.record_product_id() == id)
    }
}

/// Order-preserving subset of `records` matching `criteria`.
///
/// Never mutates the input; filtering the result again with the same criteria
/// returns it unchanged.
pub fn filter<R: ReportRecord + Clone>(
    records: &[R],
    criteria: &FilterCriteria,
) -> Result<Vec<R>, ReconciliationError> {
    criteria.validate()?;
    Ok(records
        .iter()
        .filter(|r| criteria.matches(*r))
        .cloned()
        .collect())
}
