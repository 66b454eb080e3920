//! Inventory input records.
//!
//! This crate contains the immutable snapshot records the reconciliation
//! engine consumes (products with lifecycle counters, RFID shelf-scan events),
//! validated at the boundary and free of IO.

pub mod product;
pub mod scan;

pub use product::Product;
pub use scan::{ScanEvent, ScanStatus};
