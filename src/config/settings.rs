//! User settings for tripledger
//!
//! Display preferences for the CLI. The settings file goes through the same
//! reconciliation as trip data, so a file written by an older release loads
//! with new fields at their defaults instead of failing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::paths::TripPaths;
use crate::error::TripError;
use crate::models::ConfigValue;
use crate::reconcile::{carry_stale_keys, reconcile_typed, TypedReconciled};
use crate::storage::file_io::{read_text, write_json_atomic};

/// User settings for tripledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Symbol printed in front of local-currency amounts
    #[serde(default)]
    pub local_currency_symbol: String,

    /// Hide travelers with nothing spent in ledger breakdowns
    #[serde(default = "default_true")]
    pub hide_zero_travelers: bool,

    /// Pretty-print JSON exports unless asked otherwise
    #[serde(default = "default_true")]
    pub pretty_export: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            local_currency_symbol: String::new(),
            hide_zero_travelers: true,
            pretty_export: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// A damaged settings file is not an error: defaults are used and the
    /// problem is logged.
    pub fn load_or_create(paths: &TripPaths) -> Result<Self, TripError> {
        let raw = read_text(paths.settings_file())?;
        let TypedReconciled { value, warnings } = reconcile_typed::<Settings>(raw.as_deref());
        for warning in &warnings {
            warn!(file = %paths.settings_file().display(), "settings: {}", warning);
        }
        Ok(value)
    }

    /// Save settings to disk
    ///
    /// Keys in the existing file that this release does not know are kept.
    pub fn save(&self, paths: &TripPaths) -> Result<(), TripError> {
        paths.ensure_directories()?;

        let mut fresh = ConfigValue::from_serializable(self)?;
        let stored = read_text(paths.settings_file())?.and_then(|raw| ConfigValue::parse(&raw).ok());
        if let Some(stored) = stored {
            carry_stale_keys(&ConfigValue::from_serializable(&Settings::default())?, &stored, &mut fresh);
        }
        write_json_atomic(paths.settings_file(), &fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert!(settings.hide_zero_travelers);
        assert!(settings.local_currency_symbol.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.local_currency_symbol = "¥".into();
        settings.hide_zero_travelers = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_old_file_gets_new_fields() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"schema_version": 1, "pretty_export": false}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.pretty_export);
        assert!(loaded.hide_zero_travelers);
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{{{{").unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_save_keeps_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"theme": "dark", "pretty_export": false}"#).unwrap();

        let mut settings = Settings::load_or_create(&paths).unwrap();
        settings.pretty_export = true;
        settings.save(&paths).unwrap();

        let saved = std::fs::read_to_string(paths.settings_file()).unwrap();
        assert!(saved.contains("\"theme\""));
        assert!(Settings::load_or_create(&paths).unwrap().pretty_export);
    }
}
