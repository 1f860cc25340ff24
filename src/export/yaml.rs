//! YAML Export functionality
//!
//! Exports the complete trip to YAML format for human-readable backup.

use std::io::Write;

use crate::error::{TripError, TripResult};
use crate::export::json::{import_value, FullExport, ImportedState};
use crate::models::ConfigValue;
use crate::storage::Storage;

/// Export the full trip to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> TripResult<()> {
    let export = FullExport::from_storage(storage)?;
    let export_err = |e: std::io::Error| TripError::Export(e.to_string());

    writeln!(writer, "# tripledger Full Trip Export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer, "#").map_err(export_err)?;
    writeln!(writer, "# Restore with: tripledger import <file>").map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| TripError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a YAML export
pub fn import_from_yaml(yaml_str: &str) -> TripResult<ImportedState> {
    let value: serde_json::Value =
        serde_yaml::from_str(yaml_str).map_err(|e| TripError::Import(e.to_string()))?;
    import_value(&ConfigValue::from(value))
}
