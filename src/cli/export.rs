//! CLI commands for data export and import

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::{TripError, TripResult};
use crate::export::{csv, json, yaml, ImportedState};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (expenses only)
    Csv,
    /// JSON format (full trip)
    Json,
    /// YAML format (full trip, human-readable)
    Yaml,
}

/// Handle full export
pub fn handle_export(
    storage: &Storage,
    output: PathBuf,
    format: ExportFormat,
    pretty: bool,
) -> TripResult<()> {
    let file = File::create(&output).map_err(|e| {
        TripError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => {
            csv::export_expenses_csv(storage, &mut writer)?;
            let count = storage.expenses.count()?;
            println!("Exported {} expenses to: {}", count, output.display());
            println!("Note: CSV format exports expenses only. Use JSON or YAML for a full export.");
        }
        ExportFormat::Json => {
            json::export_full_json(storage, &mut writer, pretty)?;
            println!("Full trip exported to: {}", output.display());
        }
        ExportFormat::Yaml => {
            yaml::export_full_yaml(storage, &mut writer)?;
            println!("Full trip exported to: {}", output.display());
        }
    }

    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("yaml") | Some("yml")
    )
}

/// Handle import of a JSON or YAML export, replacing the stored trip
pub fn handle_import(storage: &Storage, input: PathBuf) -> TripResult<()> {
    let text = std::fs::read_to_string(&input).map_err(|e| {
        TripError::Import(format!("Failed to read {}: {}", input.display(), e))
    })?;

    let ImportedState { state, warnings } = if is_yaml(&input) {
        yaml::import_from_yaml(&text)?
    } else {
        json::import_from_json(&text)?
    };

    storage.save_state(&state)?;

    println!(
        "Imported trip to {} ({} days, {} travelers, {} expenses)",
        if state.basics.destination.is_empty() {
            "(no destination)"
        } else {
            state.basics.destination.as_str()
        },
        state.basics.days,
        state.travelers.len(),
        state.expenses.len()
    );
    if !warnings.is_empty() {
        println!("\nRepaired while importing:");
        for warning in &warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yaml() {
        assert!(is_yaml(Path::new("trip.yaml")));
        assert!(is_yaml(Path::new("trip.YML")));
        assert!(!is_yaml(Path::new("trip.json")));
        assert!(!is_yaml(Path::new("trip")));
    }
}
