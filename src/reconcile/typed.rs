//! Reconciliation into typed settings
//!
//! The default tree is produced from `T::default()`, so adding a field with a
//! default to a settings struct is all it takes to evolve the stored schema.

use serde::{de::DeserializeOwned, Serialize};

use crate::models::ConfigValue;

use super::{merge, reconcile_raw, ReconcileWarning};

/// A typed value plus whatever had to be repaired to produce it
#[derive(Debug, Clone, PartialEq)]
pub struct TypedReconciled<T> {
    pub value: T,
    pub warnings: Vec<ReconcileWarning>,
}

/// Reconcile raw stored text into `T`
pub fn reconcile_typed<T>(raw: Option<&str>) -> TypedReconciled<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let fallback = T::default();
    let default_tree = match ConfigValue::from_serializable(&fallback) {
        Ok(tree) => tree,
        Err(e) => return incompatible(fallback, Vec::new(), e),
    };

    let reconciled = reconcile_raw(&default_tree, raw);
    finish(fallback, &default_tree, reconciled.value, reconciled.warnings)
}

/// Reconcile an already parsed stored value into `T`
///
/// Used for imported state, which arrives as a tree rather than raw text.
pub fn reconcile_typed_value<T>(stored: Option<&ConfigValue>) -> TypedReconciled<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let fallback = T::default();
    let default_tree = match ConfigValue::from_serializable(&fallback) {
        Ok(tree) => tree,
        Err(e) => return incompatible(fallback, Vec::new(), e),
    };

    let stored = stored.filter(|value| !value.is_null());
    let mut warnings = Vec::new();
    let merged = merge::reconcile_reporting(&default_tree, stored, &mut warnings);
    finish(fallback, &default_tree, merged, warnings)
}

fn finish<T: DeserializeOwned>(
    fallback: T,
    default_tree: &ConfigValue,
    merged: ConfigValue,
    mut warnings: Vec<ReconcileWarning>,
) -> TypedReconciled<T> {
    let err = match merged.to_typed::<T>() {
        Ok(value) => return TypedReconciled { value, warnings },
        Err(e) => e,
    };

    match reset_unreadable_fields::<T>(default_tree, merged, &mut warnings) {
        Some(value) => TypedReconciled { value, warnings },
        None => incompatible(fallback, warnings, err),
    }
}

/// Put back the default for every top-level field that cannot be read
///
/// Each stored field is tried on its own against the default tree, so one
/// bad value only costs that field. Returns `None` when the document still
/// does not decode.
fn reset_unreadable_fields<T: DeserializeOwned>(
    default_tree: &ConfigValue,
    merged: ConfigValue,
    warnings: &mut Vec<ReconcileWarning>,
) -> Option<T> {
    let (ConfigValue::Map(defaults), ConfigValue::Map(mut fields)) = (default_tree, merged) else {
        return None;
    };

    let mut resets = Vec::new();
    for (key, default_value) in defaults {
        let Some(stored_value) = fields.get(key) else {
            continue;
        };
        if stored_value == default_value {
            continue;
        }

        let mut candidate = defaults.clone();
        candidate.insert(key.clone(), stored_value.clone());
        if let Err(e) = ConfigValue::Map(candidate).to_typed::<T>() {
            resets.push(ReconcileWarning::FieldReset {
                path: key.clone(),
                reason: e.to_string(),
            });
            fields.insert(key.clone(), default_value.clone());
        }
    }

    if resets.is_empty() {
        return None;
    }
    let value = ConfigValue::Map(fields).to_typed::<T>().ok()?;
    warnings.extend(resets);
    Some(value)
}

fn incompatible<T>(
    fallback: T,
    mut warnings: Vec<ReconcileWarning>,
    err: serde_json::Error,
) -> TypedReconciled<T> {
    warnings.push(ReconcileWarning::Incompatible {
        reason: err.to_string(),
    });
    TypedReconciled {
        value: fallback,
        warnings,
    }
}
