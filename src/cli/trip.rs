//! Trip CLI commands
//!
//! Implements CLI commands for trip basics and currency settings.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};

use crate::error::TripResult;
use crate::ledger::total;
use crate::models::{money::format_units, TravelStyle};
use crate::services::{CurrencyUpdate, TripService, TripUpdate};
use crate::storage::Storage;

/// Travel pace as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StyleArg {
    Relaxed,
    Balanced,
    Packed,
}

impl From<StyleArg> for TravelStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Relaxed => TravelStyle::Relaxed,
            StyleArg::Balanced => TravelStyle::Balanced,
            StyleArg::Packed => TravelStyle::Packed,
        }
    }
}

/// Trip subcommands
#[derive(Subcommand)]
pub enum TripCommands {
    /// Show trip basics
    Show,
    /// Update trip basics
    Set {
        #[arg(long)]
        destination: Option<String>,
        #[arg(long)]
        origin: Option<String>,
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Trip length in days
        #[arg(long)]
        days: Option<u32>,
        /// Number of travelers
        #[arg(long)]
        travelers: Option<u32>,
        /// Total budget in local currency
        #[arg(long)]
        budget: Option<f64>,
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
        /// Interests, comma separated
        #[arg(long, value_delimiter = ',')]
        interests: Option<Vec<String>>,
    },
}

/// Currency subcommands
#[derive(Subcommand)]
pub enum CurrencyCommands {
    /// Show the home-currency conversion settings
    Show,
    /// Update the conversion settings
    Set {
        /// Local-to-home multiplier; 0 disables conversion
        #[arg(long)]
        rate: Option<f64>,
        /// Home currency symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Home currency code
        #[arg(long)]
        code: Option<String>,
    },
}

/// Handle a trip command
pub fn handle_trip_command(storage: &Storage, local_symbol: &str, cmd: TripCommands) -> TripResult<()> {
    let service = TripService::new(storage);

    match cmd {
        TripCommands::Show => {
            let basics = service.basics()?;
            let travelers = service.travelers()?;

            let destination = if basics.destination.is_empty() {
                "(not set)"
            } else {
                basics.destination.as_str()
            };
            println!("Destination: {}", destination);
            if !basics.origin.is_empty() {
                println!("From:        {}", basics.origin);
            }
            match (basics.start_date, basics.date_of_day(basics.days.saturating_sub(1))) {
                (Some(start), Some(end)) => println!("Dates:       {} to {}", start, end),
                _ => println!("Dates:       (no start date)"),
            }
            println!("Days:        {}", basics.days);
            println!("Travelers:   {}", travelers.names().join(", "));
            println!("Style:       {}", basics.style);
            if !basics.interests.is_empty() {
                println!("Interests:   {}", basics.interests.join(", "));
            }

            if let Some(budget) = basics.budget {
                let spent = total(&storage.expenses.get_all()?);
                println!(
                    "Budget:      {} ({} spent, {} left)",
                    format_units(budget, local_symbol),
                    format_units(spent, local_symbol),
                    format_units(budget - spent, local_symbol)
                );
            }
        }

        TripCommands::Set {
            destination,
            origin,
            start,
            days,
            travelers,
            budget,
            style,
            interests,
        } => {
            let basics = service.update(TripUpdate {
                destination,
                origin,
                start_date: start,
                days,
                travelers,
                budget,
                style: style.map(TravelStyle::from),
                interests,
            })?;
            println!(
                "Updated trip: {} ({} days, {} travelers)",
                if basics.destination.is_empty() {
                    "(no destination)"
                } else {
                    basics.destination.as_str()
                },
                basics.days,
                basics.travelers
            );
        }
    }

    Ok(())
}

/// Handle a currency command
pub fn handle_currency_command(storage: &Storage, cmd: CurrencyCommands) -> TripResult<()> {
    let service = TripService::new(storage);

    match cmd {
        CurrencyCommands::Show => {
            let currency = service.currency()?;
            println!("Home currency: {} ({})", currency.code, currency.symbol);
            if currency.conversion_enabled() {
                println!("Rate:          1 local = {} {}", currency.rate, currency.code);
            } else {
                println!("Rate:          not set (conversion disabled)");
            }
        }

        CurrencyCommands::Set { rate, symbol, code } => {
            let currency = service.update_currency(CurrencyUpdate { rate, symbol, code })?;
            println!(
                "Currency updated: rate {} -> {} ({})",
                currency.rate, currency.code, currency.symbol
            );
        }
    }

    Ok(())
}
