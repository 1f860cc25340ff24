//! Expense CLI commands
//!
//! Days and timeline entries are numbered from 1 on the command line and
//! stored 0-based.

use clap::Subcommand;

use crate::display::{format_expense_details, format_expense_list};
use crate::error::{TripError, TripResult};
use crate::ledger::Scope;
use crate::models::{Amount, Payer};
use crate::services::{CreateExpenseInput, ExpenseService, TripService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What was bought
        item: String,
        /// Amount in local currency (per person with --go-dutch)
        amount: String,
        /// Trip day (1-based)
        #[arg(short, long, default_value = "1")]
        day: u32,
        /// Timeline entry within the day (1-based)
        #[arg(short, long, default_value = "1")]
        entry: u32,
        /// Category (food, entertainment, tickets, shopping, transport, tips, other)
        #[arg(short, long)]
        category: Option<String>,
        /// Who paid; defaults to the first traveler
        #[arg(short, long, conflicts_with = "go_dutch")]
        payer: Option<String>,
        /// Travelers sharing the cost, comma separated
        #[arg(short, long, value_delimiter = ',')]
        split: Vec<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
        /// Everyone paid their own share
        #[arg(long)]
        go_dutch: bool,
    },
    /// List expenses
    List {
        /// Only show one trip day (1-based)
        #[arg(short, long)]
        day: Option<u32>,
    },
    /// Remove an expense
    Remove {
        /// Expense ID or unique prefix
        id: String,
    },
}

/// Convert a 1-based command-line number to a 0-based index
pub fn to_index(value: u32, what: &str) -> TripResult<u32> {
    value
        .checked_sub(1)
        .ok_or_else(|| TripError::Validation(format!("{} numbers start at 1", what)))
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> TripResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            item,
            amount,
            day,
            entry,
            category,
            payer,
            split,
            note,
            go_dutch,
        } => {
            let amount = Amount::parse(&amount).map_err(|e| TripError::Validation(e.to_string()))?;

            let payer = if go_dutch {
                Payer::GoDutch
            } else {
                match payer {
                    Some(name) => Payer::traveler(name),
                    None => {
                        let roster = TripService::new(storage).travelers()?;
                        let first = roster.names().first().cloned().ok_or_else(|| {
                            TripError::Validation("No travelers configured; pass --payer".into())
                        })?;
                        Payer::traveler(first)
                    }
                }
            };

            let split = if go_dutch && split.is_empty() {
                TripService::new(storage).travelers()?.names().to_vec()
            } else {
                split
            };

            let record = service.add(CreateExpenseInput {
                day_index: to_index(day, "Day")?,
                timeline_index: to_index(entry, "Entry")?,
                item,
                category,
                amount,
                payer,
                splitters: split,
                note,
            })?;

            println!("Recorded expense:\n");
            print!("{}", format_expense_details(&record));
        }

        ExpenseCommands::List { day } => {
            let scope = Scope::from(day.map(|d| to_index(d, "Day")).transpose()?);
            let records = service.list(scope)?;
            println!("{}", format_expense_list(&records));
            if !records.is_empty() {
                println!("\n{}: {} expenses", scope, records.len());
            }
        }

        ExpenseCommands::Remove { id } => {
            let record = service.remove(&id)?;
            println!("Removed expense {}: {}", record.id, record.item);
        }
    }

    Ok(())
}
