//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod credential;
pub mod expense;
pub mod export;
pub mod itinerary;
pub mod ledger;
pub mod traveler;
pub mod trip;

pub use credential::{handle_credential_command, CredentialCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export, handle_import, ExportFormat};
pub use itinerary::{handle_itinerary_command, ItineraryCommands};
pub use ledger::handle_ledger_command;
pub use traveler::{handle_traveler_command, TravelerCommands};
pub use trip::{handle_currency_command, handle_trip_command, CurrencyCommands, TripCommands};
