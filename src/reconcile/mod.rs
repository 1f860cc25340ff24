//! State reconciliation
//!
//! Persisted settings are written by whatever version of the tool was running
//! at the time. On load each stored document is merged over the current
//! default so new fields get their defaults and user-entered values survive.
//!
//! Nothing here fails: unreadable or ill-shaped input degrades to the default
//! and is described by a [`ReconcileWarning`] the caller can log or show.
//!
//! ```rust
//! use serde_json::json;
//! use tripledger::models::ConfigValue;
//! use tripledger::reconcile::reconcile;
//!
//! let default = ConfigValue::from(json!({"a": 1, "b": {"c": 2, "d": 3}}));
//! let stored = ConfigValue::from(json!({"b": {"c": 99}}));
//! let merged = reconcile(&default, Some(&stored));
//! assert_eq!(merged, ConfigValue::from(json!({"a": 1, "b": {"c": 99, "d": 3}})));
//! ```

mod merge;
mod typed;

pub use merge::{carry_stale_keys, reconcile, stale_keys};
pub use typed::{reconcile_typed, reconcile_typed_value, TypedReconciled};

use thiserror::Error;

use crate::models::ConfigValue;

/// A recoverable problem found while reconciling stored state
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileWarning {
    /// Stored text was not valid JSON; the default was used
    #[error("stored data could not be parsed ({reason}); using defaults")]
    Unparseable { reason: String },

    /// A stored value was not a mapping where the default is one
    #[error("stored {found} at {path} does not match expected {expected}; using defaults there")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// One stored field had the wrong type and was reset to its default
    #[error("stored {path} could not be read ({reason}); using its default")]
    FieldReset { path: String, reason: String },

    /// The merged document could not be read as the typed setting
    #[error("stored data is incompatible with this version ({reason}); using defaults")]
    Incompatible { reason: String },

    /// A stored number was larger than the planner supports
    #[error("stored {path} of {found} exceeds the limit of {limit}; using {limit}")]
    Clamped { path: String, found: u64, limit: u64 },

    /// One entry of a stored list was unreadable and was skipped
    #[error("entry {index} could not be read ({reason}); skipped")]
    DroppedEntry { index: usize, reason: String },
}

/// Result of reconciling raw stored text
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub value: ConfigValue,
    pub warnings: Vec<ReconcileWarning>,
}

impl Reconciled {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Reconcile raw stored text against a default value
///
/// `None` (nothing stored), blank text and a top-level JSON `null` all count
/// as absent. Text that fails to parse is treated as absent and reported.
pub fn reconcile_raw(default: &ConfigValue, raw: Option<&str>) -> Reconciled {
    let mut warnings = Vec::new();

    let stored = match raw.map(str::trim).filter(|text| !text.is_empty()) {
        None => None,
        Some(text) => match ConfigValue::parse(text) {
            Ok(ConfigValue::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                warnings.push(ReconcileWarning::Unparseable {
                    reason: e.to_string(),
                });
                None
            }
        },
    };

    let value = merge::reconcile_reporting(default, stored.as_ref(), &mut warnings);
    Reconciled { value, warnings }
}
