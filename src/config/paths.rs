//! Path management for tripledger
//!
//! ## Path Resolution Order
//!
//! 1. `TRIPLEDGER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/tripledger` or `~/.config/tripledger`
//! 3. Windows: `%APPDATA%\tripledger`

use std::path::{Path, PathBuf};

use crate::error::TripError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "TRIPLEDGER_DATA_DIR";

/// Manages all paths used by tripledger
#[derive(Debug, Clone)]
pub struct TripPaths {
    base_dir: PathBuf,
}

impl TripPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, TripError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create TripPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding one JSON document per storage key
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), TripError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TripError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TripError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if tripledger has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, TripError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("tripledger"));
        }
    }
    let home = std::env::var("HOME")
        .map_err(|_| TripError::Config("Could not determine HOME directory".into()))?;
    Ok(PathBuf::from(home).join(".config").join("tripledger"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, TripError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| TripError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("tripledger"))
}
