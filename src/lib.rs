//! tripledger - trip planning state and a shared expense ledger
//!
//! This library provides the core of a travel planner: persisted trip
//! settings that survive schema changes between releases, and a ledger of
//! shared expenses with per-category, per-traveler and settlement views.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (config tree, expenses, trip settings)
//! - `reconcile`: Deep merge of stored state over current defaults
//! - `ledger`: Pure expense aggregation and settlement
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `itinerary`: Extraction and text coercion of generated itineraries
//! - `export`: JSON, YAML and CSV export and import
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use tripledger::config::{paths::TripPaths, settings::Settings};
//! use tripledger::storage::Storage;
//!
//! let paths = TripPaths::new()?;
//! let storage = Storage::new(paths)?;
//! let loaded = storage.load_state()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod itinerary;
pub mod ledger;
pub mod models;
pub mod reconcile;
pub mod services;
pub mod storage;

pub use error::TripError;
