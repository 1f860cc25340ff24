//! Storage keys and the on-disk key/value store
//!
//! Each domain of trip state lives in its own JSON document, written and
//! replaced wholesale.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::error::TripError;

use super::file_io::{read_text, remove_file, write_json_atomic};

/// Logical storage entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    TripBasics,
    Flights,
    Accommodations,
    TravelerNames,
    Expenses,
    Currency,
    ApiCredential,
    Itinerary,
}

impl StorageKey {
    pub const ALL: [StorageKey; 8] = [
        Self::TripBasics,
        Self::Flights,
        Self::Accommodations,
        Self::TravelerNames,
        Self::Expenses,
        Self::Currency,
        Self::ApiCredential,
        Self::Itinerary,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::TripBasics => "trip_basics.json",
            Self::Flights => "flights.json",
            Self::Accommodations => "accommodations.json",
            Self::TravelerNames => "traveler_names.json",
            Self::Expenses => "expenses.json",
            Self::Currency => "currency.json",
            Self::ApiCredential => "api_credential.json",
            Self::Itinerary => "itinerary.json",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.file_name().trim_end_matches(".json");
        write!(f, "{}", name)
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    dir: PathBuf,
}

impl KeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Raw stored text, or `None` when nothing has been stored
    pub fn get_raw(&self, key: StorageKey) -> Result<Option<String>, TripError> {
        read_text(self.path_for(key))
    }

    /// Replace the stored document for `key`
    pub fn put<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<(), TripError> {
        debug!(%key, "writing");
        write_json_atomic(self.path_for(key), value)
    }

    pub fn remove(&self, key: StorageKey) -> Result<(), TripError> {
        debug!(%key, "removing");
        remove_file(self.path_for(key))
    }

    pub fn contains(&self, key: StorageKey) -> bool {
        self.path_for(key).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_names_unique() {
        let mut names: Vec<_> = StorageKey::ALL.iter().map(|k| k.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), StorageKey::ALL.len());
        assert_eq!(StorageKey::TravelerNames.to_string(), "traveler_names");
    }

    #[test]
    fn test_put_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyValueStore::new(temp_dir.path().to_path_buf());

        assert_eq!(store.get_raw(StorageKey::Currency).unwrap(), None);

        store.put(StorageKey::Currency, &serde_json::json!({"rate": 0.2})).unwrap();
        assert!(store.contains(StorageKey::Currency));
        let raw = store.get_raw(StorageKey::Currency).unwrap().unwrap();
        assert!(raw.contains("0.2"));

        store.remove(StorageKey::Currency).unwrap();
        assert!(!store.contains(StorageKey::Currency));
    }
}
