//! Core data models for tripledger
//!
//! This module contains the data structures of the trip planner: the loosely
//! typed configuration tree, expense records and the typed trip settings that
//! are persisted between sessions.

pub mod config_value;
pub mod currency;
pub mod expense;
pub mod ids;
pub mod money;
pub mod traveler;
pub mod trip;

pub use config_value::ConfigValue;
pub use currency::CurrencySettings;
pub use expense::{ExpenseRecord, Payer, GO_DUTCH_LABEL, GO_DUTCH_MARKER, KNOWN_CATEGORIES};
pub use ids::ExpenseId;
pub use money::Amount;
pub use traveler::{TravelerRoster, MAX_TRAVELERS};
pub use trip::{
    Accommodation, AccommodationPlan, ApiCredential, Flight, FlightDirection, FlightPlan,
    TravelStyle, TripBasics,
};
