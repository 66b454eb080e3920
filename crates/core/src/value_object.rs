//! Value object trait: equality by value, not identity.
//!
//! Derived reconciliation outputs (discrepancies, metrics, theft occurrences)
//! have **no identity** - they are defined entirely by their attribute values
//! and can be recomputed from the same snapshot at any time.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Recomputing a
/// value object from identical inputs must yield an equal value, which is what
/// makes reconciliation results safe to compare across runs.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Shortfall {
///     units: u64,
/// }
///
/// impl ValueObject for Shortfall {}
///
/// assert_eq!(Shortfall { units: 5 }, Shortfall { units: 5 });
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
