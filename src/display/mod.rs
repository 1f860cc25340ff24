//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display:
//! expense tables, report helpers and chart geometry for the ledger.

pub mod chart;
pub mod expense;
pub mod report;

pub use chart::{pie_slices, PieSlice};
pub use expense::{format_expense_details, format_expense_list};
pub use report::{format_bar, format_header, format_percentage, percentage_of, truncate};
