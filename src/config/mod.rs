//! Configuration module for tripledger
//!
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TripPaths;
pub use settings::Settings;
