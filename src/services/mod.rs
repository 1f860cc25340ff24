//! Service layer for tripledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation and cross-entity updates.

pub mod expense;
pub mod trip;

pub use expense::{CreateExpenseInput, ExpenseService};
pub use trip::{CurrencyUpdate, TripService, TripUpdate};
