//! Itinerary CLI commands

use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use crate::error::{TripError, TripResult};
use crate::itinerary::{extract_json, ItineraryView};
use crate::ledger::{filter_by_scope, total, Scope};
use crate::models::money::format_units;
use crate::storage::{AppState, Storage};

/// Itinerary subcommands
#[derive(Subcommand)]
pub enum ItineraryCommands {
    /// Store an itinerary from generator output (JSON, possibly wrapped in prose)
    Import { file: PathBuf },
    /// Show the stored itinerary with recorded spending per day
    Show,
}

/// Handle an itinerary command
pub fn handle_itinerary_command(
    storage: &Storage,
    state: &AppState,
    local_symbol: &str,
    cmd: ItineraryCommands,
) -> TripResult<()> {
    match cmd {
        ItineraryCommands::Import { file } => {
            let text = std::fs::read_to_string(&file).map_err(|e| {
                TripError::Import(format!("Failed to read {}: {}", file.display(), e))
            })?;
            let value = extract_json(&text).ok_or_else(|| {
                TripError::Import(format!("No JSON itinerary found in {}", file.display()))
            })?;

            let view = ItineraryView::from_value(&value);
            if view.is_empty() {
                return Err(TripError::Import(
                    "The document contains no itinerary days".into(),
                ));
            }

            storage.save_itinerary(&value)?;
            info!(days = view.days.len(), "stored itinerary");
            println!("Stored itinerary with {} days.", view.days.len());
            if view.days.len() as u32 != state.basics.days {
                println!(
                    "Note: the trip is set to {} days. Run 'tripledger trip set --days {}' to match.",
                    state.basics.days,
                    view.days.len()
                );
            }
        }

        ItineraryCommands::Show => {
            let view = ItineraryView::from_value(&state.itinerary);
            if view.is_empty() {
                println!("No itinerary stored.");
                println!("\nRun 'tripledger itinerary import <file>' to add one.");
                return Ok(());
            }

            for (i, day) in view.days.iter().enumerate() {
                let day_index = i as u32;
                let date = state
                    .basics
                    .date_of_day(day_index)
                    .map(|d| format!(" ({})", d))
                    .unwrap_or_default();
                println!("Day {}{}: {}", i + 1, date, day.title);

                let day_expenses = filter_by_scope(&state.expenses, Scope::Day(day_index));
                for (j, entry) in day.entries.iter().enumerate() {
                    let time = entry
                        .time
                        .as_deref()
                        .map(|t| format!("[{}] ", t))
                        .unwrap_or_default();
                    let spent: f64 = day_expenses
                        .iter()
                        .filter(|e| e.timeline_index as usize == j)
                        .map(|e| e.amount.effective())
                        .sum();
                    if spent > 0.0 {
                        println!(
                            "  {:>2}. {}{}  ({})",
                            j + 1,
                            time,
                            entry.text,
                            format_units(spent, local_symbol)
                        );
                    } else {
                        println!("  {:>2}. {}{}", j + 1, time, entry.text);
                    }
                }

                let day_total = total(&day_expenses);
                if day_total > 0.0 {
                    println!("      Day total: {}", format_units(day_total, local_symbol));
                }
                if let Some(stay) = state.accommodations.stay_for_night(day_index) {
                    println!("      Night: {}", stay.name);
                }
                println!();
            }
        }
    }

    Ok(())
}
