//! Item-table helpers: search, sort and dated discrepancy rows.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shrinkwatch_inventory::Product;

use crate::discrepancy::{compute_batch, compute_discrepancy};
use crate::model::{DiscrepancyRecord, FailedProduct};

/// Column an item listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Rfid,
    Total,
    Sold,
    ActualRemaining,
    Price,
    Discrepancy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Case-insensitive substring search over product name and RFID tag.
///
/// An empty (or all-whitespace) query matches everything.
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.rfid
                    .as_deref()
                    .is_some_and(|tag| tag.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Stable sort of a product listing.
///
/// For [`SortKey::Discrepancy`], products whose discrepancy cannot be computed
/// always sort last regardless of direction.
pub fn sort_products(products: &[Product], key: SortKey, direction: SortDirection) -> Vec<&Product> {
    let mut sorted: Vec<&Product> = products.iter().collect();

    if key == SortKey::Discrepancy {
        let mut keyed: Vec<(Option<i64>, &Product)> = sorted
            .into_iter()
            .map(|p| (compute_discrepancy(p).ok().map(|r| r.discrepancy), p))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => directed(a.cmp(b), direction),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        return keyed.into_iter().map(|(_, p)| p).collect();
    }

    sorted.sort_by(|a, b| directed(compare_by(a, b, key), direction));
    sorted
}

fn compare_by(a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Rfid => a.rfid.cmp(&b.rfid),
        SortKey::Total => a.total.cmp(&b.total),
        SortKey::Sold => a.sold.cmp(&b.sold),
        SortKey::ActualRemaining => a.actual_remaining.cmp(&b.actual_remaining),
        SortKey::Price => a.price.cmp(&b.price),
        // handled by the caller
        SortKey::Discrepancy => Ordering::Equal,
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Dated reporting rows for every product currently showing shrinkage.
///
/// Returns the rows plus any products whose counters could not be evaluated.
pub fn discrepancy_records(products: &[Product], date: NaiveDate) -> (Vec<DiscrepancyRecord>, Vec<FailedProduct>) {
    let batch = compute_batch(products);
    let rows = batch
        .evaluated
        .iter()
        .filter(|(_, r)| r.is_shrinkage())
        .map(|(p, r)| DiscrepancyRecord {
            date,
            product_id: p.id.clone(),
            product_name: p.name.clone(),
            discrepancy: r.discrepancy,
            loss: r.loss,
        })
        .collect();
    (rows, batch.failed)
}
