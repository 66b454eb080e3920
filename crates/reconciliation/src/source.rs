//! Collaborator interface for reading inventory snapshots.
//!
//! The engine never owns records; whoever does (a REST client, a read model,
//! a fixture file) implements [`InventorySource`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use shrinkwatch_core::InventoryId;
use shrinkwatch_inventory::{Product, ScanEvent};

use crate::error::ReconciliationError;

pub trait InventorySource: Send + Sync {
    fn products(&self, inventory_id: &InventoryId) -> Result<Vec<Product>, ReconciliationError>;

    fn scan_events(&self, inventory_id: &InventoryId) -> Result<Vec<ScanEvent>, ReconciliationError>;
}

impl<T: InventorySource + ?Sized> InventorySource for std::sync::Arc<T> {
    fn products(&self, inventory_id: &InventoryId) -> Result<Vec<Product>, ReconciliationError> {
        (**self).products(inventory_id)
    }

    fn scan_events(&self, inventory_id: &InventoryId) -> Result<Vec<ScanEvent>, ReconciliationError> {
        (**self).scan_events(inventory_id)
    }
}

/// Serialized snapshot of one or more inventories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default, alias = "rfidScans", alias = "scanEvents")]
    pub scans: Vec<ScanEvent>,
}

impl InventorySnapshot {
    pub fn from_json(json: &str) -> Result<Self, ReconciliationError> {
        serde_json::from_str(json).map_err(|e| ReconciliationError::Source(format!("invalid snapshot: {e}")))
    }
}

/// Snapshot-backed source (tests, fixtures, CLI).
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventorySource {
    snapshot: InventorySnapshot,
}

impl InMemoryInventorySource {
    pub fn new(products: Vec<Product>, scans: Vec<ScanEvent>) -> Self {
        Self::from_snapshot(InventorySnapshot { products, scans })
    }

    pub fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Distinct inventory ids present in the snapshot, in first-seen order.
    pub fn inventory_ids(&self) -> Vec<InventoryId> {
        let mut seen: HashSet<&InventoryId> = HashSet::new();
        self.snapshot
            .products
            .iter()
            .map(|p| &p.inventory_id)
            .chain(self.snapshot.scans.iter().map(|s| &s.inventory_id))
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }
}

impl InventorySource for InMemoryInventorySource {
    fn products(&self, inventory_id: &InventoryId) -> Result<Vec<Product>, ReconciliationError> {
        Ok(self
            .snapshot
            .products
            .iter()
            .filter(|p| &p.inventory_id == inventory_id)
            .cloned()
            .collect())
    }

    fn scan_events(&self, inventory_id: &InventoryId) -> Result<Vec<ScanEvent>, ReconciliationError> {
        Ok(self
            .snapshot
            .scans
            .iter()
            .filter(|s| &s.inventory_id == inventory_id)
            .cloned()
            .collect())
    }
}
