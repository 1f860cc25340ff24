//! Deep merge of stored configuration over defaults

use std::collections::BTreeMap;

use crate::models::ConfigValue;

use super::ReconcileWarning;

/// Merge a stored value over a default value
///
/// - No stored value: the default is returned unchanged.
/// - Both mappings: every default key is present in the result. Keys whose
///   default is a mapping recurse; every other key takes the stored value if
///   there is one. Keys only present in the stored mapping are carried over.
/// - Default is a mapping but the stored value is not: the default wins.
/// - Default is a scalar or list: the stored value replaces it wholesale.
pub fn reconcile(default: &ConfigValue, stored: Option<&ConfigValue>) -> ConfigValue {
    let mut ignored = Vec::new();
    reconcile_reporting(default, stored, &mut ignored)
}

/// Same as [`reconcile`], recording every place where a stored value had to be
/// discarded because it was not a mapping where the default is one.
pub(crate) fn reconcile_reporting(
    default: &ConfigValue,
    stored: Option<&ConfigValue>,
    warnings: &mut Vec<ReconcileWarning>,
) -> ConfigValue {
    match stored {
        None => default.clone(),
        Some(stored) => merge_at(default, stored, "", warnings),
    }
}

fn merge_at(
    default: &ConfigValue,
    stored: &ConfigValue,
    path: &str,
    warnings: &mut Vec<ReconcileWarning>,
) -> ConfigValue {
    match (default, stored) {
        (ConfigValue::Map(defaults), ConfigValue::Map(saved)) => {
            let mut merged: BTreeMap<String, ConfigValue> = saved.clone();
            for (key, default_value) in defaults {
                let value = match saved.get(key) {
                    None => default_value.clone(),
                    Some(saved_value) if default_value.is_map() => {
                        merge_at(default_value, saved_value, &join_path(path, key), warnings)
                    }
                    Some(saved_value) => saved_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            ConfigValue::Map(merged)
        }
        (ConfigValue::Map(_), other) => {
            warnings.push(ReconcileWarning::ShapeMismatch {
                path: display_path(path),
                expected: default.kind(),
                found: other.kind(),
            });
            default.clone()
        }
        (_, other) => other.clone(),
    }
}

/// Dotted paths of stored keys that the default no longer knows about
///
/// The merge keeps these forever; this is only a diagnostic.
pub fn stale_keys(default: &ConfigValue, stored: &ConfigValue) -> Vec<String> {
    let mut found = Vec::new();
    collect_stale(default, stored, "", &mut found);
    found
}

fn collect_stale(default: &ConfigValue, stored: &ConfigValue, path: &str, found: &mut Vec<String>) {
    if let (ConfigValue::Map(defaults), ConfigValue::Map(saved)) = (default, stored) {
        for (key, saved_value) in saved {
            let key_path = join_path(path, key);
            match defaults.get(key) {
                None => found.push(key_path),
                Some(default_value) => collect_stale(default_value, saved_value, &key_path, found),
            }
        }
    }
}

/// Copy stored keys the default does not know into a freshly serialized value
///
/// Typed values only serialize the fields they declare, so writing one back
/// would otherwise drop whatever a different release stored alongside them.
pub fn carry_stale_keys(default: &ConfigValue, stored: &ConfigValue, fresh: &mut ConfigValue) {
    if let (ConfigValue::Map(defaults), ConfigValue::Map(saved), ConfigValue::Map(target)) =
        (default, stored, fresh)
    {
        for (key, saved_value) in saved {
            match defaults.get(key) {
                None => {
                    target
                        .entry(key.clone())
                        .or_insert_with(|| saved_value.clone());
                }
                Some(default_value) => {
                    if let Some(target_value) = target.get_mut(key) {
                        carry_stale_keys(default_value, saved_value, target_value);
                    }
                }
            }
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cv(value: serde_json::Value) -> ConfigValue {
        ConfigValue::from(value)
    }

    #[test]
    fn test_absent_returns_default() {
        let default = cv(json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(reconcile(&default, None), default);
    }

    #[test]
    fn test_nested_merge() {
        let default = cv(json!({"a": 1, "b": {"c": 2, "d": 3}}));
        let stored = cv(json!({"b": {"c": 99}}));
        assert_eq!(
            reconcile(&default, Some(&stored)),
            cv(json!({"a": 1, "b": {"c": 99, "d": 3}}))
        );
    }

    #[test]
    fn test_non_mapping_stored_falls_back() {
        let default = cv(json!({"a": 1}));
        let stored = cv(json!("not an object"));
        assert_eq!(reconcile(&default, Some(&stored)), default);

        let mut warnings = Vec::new();
        reconcile_reporting(&default, Some(&stored), &mut warnings);
        assert_eq!(
            warnings,
            vec![ReconcileWarning::ShapeMismatch {
                path: "(root)".into(),
                expected: "mapping",
                found: "string",
            }]
        );
    }

    #[test]
    fn test_nested_shape_drift_keeps_default_branch() {
        let default = cv(json!({"currency": {"rate": 0, "symbol": "$"}}));
        let stored = cv(json!({"currency": 4.5}));
        let mut warnings = Vec::new();
        let merged = reconcile_reporting(&default, Some(&stored), &mut warnings);
        assert_eq!(merged, default);
        assert!(matches!(
            &warnings[0],
            ReconcileWarning::ShapeMismatch { path, .. } if path == "currency"
        ));
    }

    #[test]
    fn test_lists_replace_wholesale() {
        let default = cv(json!({"names": ["A", "B", "C"]}));
        let stored = cv(json!({"names": ["Zed"]}));
        assert_eq!(
            reconcile(&default, Some(&stored)),
            cv(json!({"names": ["Zed"]}))
        );
    }

    #[test]
    fn test_scalar_default_takes_any_stored_shape() {
        let default = cv(json!({"rate": 0}));
        let stored = cv(json!({"rate": {"weird": true}}));
        assert_eq!(reconcile(&default, Some(&stored)), stored);

        let top = cv(json!([1, 2]));
        assert_eq!(reconcile(&top, Some(&cv(json!("x")))), cv(json!("x")));
    }

    #[test]
    fn test_stored_only_keys_carried_through() {
        let default = cv(json!({"a": 1}));
        let stored = cv(json!({"a": 2, "legacy": {"x": 1}}));
        assert_eq!(
            reconcile(&default, Some(&stored)),
            cv(json!({"a": 2, "legacy": {"x": 1}}))
        );
    }

    #[test]
    fn test_stored_null_wins_for_scalar() {
        let default = cv(json!({"budget": 100}));
        let stored = cv(json!({"budget": null}));
        assert_eq!(
            reconcile(&default, Some(&stored)),
            cv(json!({"budget": null}))
        );
    }

    #[test]
    fn test_inputs_not_mutated() {
        let default = cv(json!({"a": {"b": 1}}));
        let stored = cv(json!({"a": {"c": 2}}));
        let (d, s) = (default.clone(), stored.clone());
        let _ = reconcile(&default, Some(&stored));
        assert_eq!(default, d);
        assert_eq!(stored, s);
    }

    #[test]
    fn test_stale_keys() {
        let default = cv(json!({"a": 1, "b": {"c": 2}}));
        let stored = cv(json!({"a": 1, "old": true, "b": {"c": 3, "gone": 1}}));
        assert_eq!(stale_keys(&default, &stored), vec!["b.gone", "old"]);
        assert!(stale_keys(&default, &cv(json!(5))).is_empty());
    }

    #[test]
    fn test_carry_stale_keys() {
        let default = cv(json!({"a": 1, "b": {"c": 2}}));
        let stored = cv(json!({"a": 7, "old": true, "b": {"c": 3, "gone": 1}}));
        let mut fresh = cv(json!({"a": 9, "b": {"c": 4}}));

        carry_stale_keys(&default, &stored, &mut fresh);
        assert_eq!(fresh, cv(json!({"a": 9, "old": true, "b": {"c": 4, "gone": 1}})));
        assert!(stale_keys(&default, &fresh).contains(&"old".to_string()));
    }
}
