//! Engine configuration.
//!
//! Read from the environment:
//! - `SHRINKWATCH_OCCURRENCE_MODE`: `per_scan` (default) | `per_product`
//! - `SHRINKWATCH_ERROR_POLICY`: `best_effort` (default) | `all_or_nothing`

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::reconciler::OccurrenceMode;

pub const OCCURRENCE_MODE_VAR: &str = "SHRINKWATCH_OCCURRENCE_MODE";
pub const ERROR_POLICY_VAR: &str = "SHRINKWATCH_ERROR_POLICY";

/// What a batch does with products whose counters are invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Exclude failing products, report them, keep going.
    #[default]
    BestEffort,
    /// Fail the whole batch on the first invalid product.
    AllOrNothing,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "besteffort" => Ok(Self::BestEffort),
            "all_or_nothing" | "allornothing" | "strict" => Ok(Self::AllOrNothing),
            other => Err(format!("unknown error policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationConfig {
    pub occurrence_mode: OccurrenceMode,
    pub error_policy: ErrorPolicy,
}

impl ReconciliationConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; invalid values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            occurrence_mode: parse_or_default(&lookup, OCCURRENCE_MODE_VAR),
            error_policy: parse_or_default(&lookup, ERROR_POLICY_VAR),
        }
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str) -> T
where
    T: FromStr<Err = String> + Default + core::fmt::Debug,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return T::default();
    };

    raw.parse().unwrap_or_else(|e: String| {
        let fallback = T::default();
        warn!(key, value = %raw, error = %e, ?fallback, "invalid configuration value; using default");
        fallback
    })
}
