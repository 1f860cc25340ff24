//! Ledger CLI command
//!
//! Prints the aggregate views for the whole trip or one day, or writes them
//! to CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::Settings;
use crate::error::{TripError, TripResult};
use crate::ledger::{LedgerSummary, Scope};
use crate::storage::AppState;

use super::expense::to_index;

/// Handle the ledger command
pub fn handle_ledger_command(
    state: &AppState,
    settings: &Settings,
    day: Option<u32>,
    output: Option<PathBuf>,
) -> TripResult<()> {
    let scope = Scope::from(day.map(|d| to_index(d, "Day")).transpose()?);
    let summary = LedgerSummary::generate(
        &state.expenses,
        state.travelers.names(),
        scope,
        &state.currency,
    );

    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                TripError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            summary.export_csv(BufWriter::new(file))?;
            println!("Ledger ({}) exported to: {}", scope, path.display());
        }
        None => {
            print!(
                "{}",
                summary.format_terminal(&settings.local_currency_symbol, settings.hide_zero_travelers)
            );
        }
    }

    Ok(())
}
