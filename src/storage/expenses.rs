//! Expense repository for JSON storage
//!
//! Manages loading and saving expense records to expenses.json. Records are
//! read one at a time so a single damaged entry does not cost the rest of the
//! ledger.

use std::sync::RwLock;

use tracing::debug;

use crate::error::TripError;
use crate::models::{ConfigValue, ExpenseId, ExpenseRecord};
use crate::reconcile::ReconcileWarning;

use super::keys::{KeyValueStore, StorageKey};

/// Repository for expense persistence
pub struct ExpenseRepository {
    store: KeyValueStore,
    data: RwLock<Vec<ExpenseRecord>>,
}

/// Decode stored expense text, skipping unreadable records
pub fn decode_expenses(raw: Option<&str>) -> (Vec<ExpenseRecord>, Vec<ReconcileWarning>) {
    let mut warnings = Vec::new();

    let text = match raw.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => text,
        None => return (Vec::new(), warnings),
    };

    let stored = match ConfigValue::parse(text) {
        Ok(value) => value,
        Err(e) => {
            warnings.push(ReconcileWarning::Unparseable {
                reason: e.to_string(),
            });
            return (Vec::new(), warnings);
        }
    };

    (decode_expense_list(&stored, &mut warnings), warnings)
}

/// Decode an already parsed expense list, skipping unreadable records
pub fn decode_expense_list(
    stored: &ConfigValue,
    warnings: &mut Vec<ReconcileWarning>,
) -> Vec<ExpenseRecord> {
    let entries = match stored {
        ConfigValue::Null => return Vec::new(),
        ConfigValue::List(entries) => entries,
        other => {
            warnings.push(ReconcileWarning::ShapeMismatch {
                path: "(root)".to_string(),
                expected: "list",
                found: other.kind(),
            });
            return Vec::new();
        }
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry.to_typed::<ExpenseRecord>() {
            Ok(record) => Some(record),
            Err(e) => {
                warnings.push(ReconcileWarning::DroppedEntry {
                    index,
                    reason: e.to_string(),
                });
                None
            }
        })
        .collect()
}

impl ExpenseRepository {
    pub fn new(store: KeyValueStore) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load expenses from disk, returning what had to be skipped
    pub fn load(&self) -> Result<Vec<ReconcileWarning>, TripError> {
        let raw = self.store.get_raw(StorageKey::Expenses)?;
        let (records, warnings) = decode_expenses(raw.as_deref());
        debug!(count = records.len(), "loaded expenses");

        let mut data = self
            .data
            .write()
            .map_err(|e| TripError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = records;

        Ok(warnings)
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), TripError> {
        let data = self
            .data
            .read()
            .map_err(|e| TripError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        self.store.put(StorageKey::Expenses, &*data)
    }

    /// All expenses in entry order
    pub fn get_all(&self) -> Result<Vec<ExpenseRecord>, TripError> {
        let data = self
            .data
            .read()
            .map_err(|e| TripError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<ExpenseRecord>, TripError> {
        let data = self
            .data
            .read()
            .map_err(|e| TripError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().find(|r| r.id == id).cloned())
    }

    /// Expenses whose ID starts with `prefix`
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<ExpenseRecord>, TripError> {
        let data = self
            .data
            .read()
            .map_err(|e| TripError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().filter(|r| r.id.matches(prefix)).cloned().collect())
    }

    pub fn insert(&self, record: ExpenseRecord) -> Result<(), TripError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TripError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.push(record);
        Ok(())
    }

    /// Replace every record, as after an import
    pub fn replace_all(&self, records: Vec<ExpenseRecord>) -> Result<(), TripError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TripError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = records;
        Ok(())
    }

    /// Remove an expense, returning it if it existed
    pub fn remove(&self, id: ExpenseId) -> Result<Option<ExpenseRecord>, TripError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TripError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let position = data.iter().position(|r| r.id == id);
        Ok(position.map(|index| data.remove(index)))
    }

    pub fn count(&self) -> Result<usize, TripError> {
        let data = self
            .data
            .read()
            .map_err(|e| TripError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Payer};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyValueStore::new(temp_dir.path().to_path_buf());
        (temp_dir, ExpenseRepository::new(store))
    }

    fn sample(item: &str) -> ExpenseRecord {
        ExpenseRecord::new(0, 0, item, "food", Amount::new(100.0), Payer::traveler("A"), vec![])
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        let warnings = repo.load().unwrap();
        assert!(warnings.is_empty());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_save_load() {
        let (_temp_dir, repo) = create_test_repo();
        let record = sample("Lunch");
        let id = record.id;

        repo.insert(record).unwrap();
        repo.insert(sample("Dinner")).unwrap();
        repo.save().unwrap();

        repo.load().unwrap();
        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].item, "Lunch");
        assert_eq!(repo.get(id).unwrap().unwrap().item, "Lunch");
    }

    #[test]
    fn test_remove() {
        let (_temp_dir, repo) = create_test_repo();
        let record = sample("Coffee");
        let id = record.id;
        repo.insert(record).unwrap();

        assert!(repo.remove(id).unwrap().is_some());
        assert!(repo.remove(id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_find_by_prefix() {
        let (_temp_dir, repo) = create_test_repo();
        let record = sample("Tea");
        let prefix = record.id.as_uuid().to_string()[..6].to_string();
        repo.insert(record).unwrap();

        assert_eq!(repo.find_by_prefix(&prefix).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_skips_bad_entries() {
        let good = serde_json::to_string(&sample("Ramen")).unwrap();
        let raw = format!(r#"[{}, {{"item": 5}}, "junk"]"#, good);

        let (records, warnings) = decode_expenses(Some(&raw));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item, "Ramen");
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], ReconcileWarning::DroppedEntry { index: 1, .. }));
    }

    #[test]
    fn test_decode_wrong_shape() {
        let (records, warnings) = decode_expenses(Some(r#"{"not": "a list"}"#));
        assert!(records.is_empty());
        assert!(matches!(
            warnings.as_slice(),
            [ReconcileWarning::ShapeMismatch { expected: "list", found: "mapping", .. }]
        ));
    }

    #[test]
    fn test_decode_garbage() {
        let (records, warnings) = decode_expenses(Some("[[[["));
        assert!(records.is_empty());
        assert!(matches!(warnings.as_slice(), [ReconcileWarning::Unparseable { .. }]));
    }
}
