//! Expense ledger engine
//!
//! Pure aggregation over expense records: scope filtering, per-category and
//! per-traveler totals, home-currency conversion and settlement balances.
//! Nothing here holds state or performs I/O; every function takes its inputs
//! by reference and returns fresh values.

mod aggregate;
mod settlement;
mod summary;

pub use aggregate::{aggregate_by_category, aggregate_by_traveler, convert, filter_by_scope, total};
pub use settlement::{settle, suggest_transfers, Transfer, TravelerBalance};
pub use summary::LedgerSummary;

use serde::Serialize;
use std::fmt;

use crate::models::ExpenseRecord;

/// Tolerance used when comparing accumulated float totals
pub const AMOUNT_EPSILON: f64 = 0.005;

/// Which expenses an aggregate covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Scope {
    /// Every expense of the trip
    #[default]
    Trip,
    /// Only expenses of one itinerary day (0-based)
    Day(u32),
}

impl Scope {
    pub fn contains(&self, record: &ExpenseRecord) -> bool {
        match self {
            Self::Trip => true,
            Self::Day(day) => record.day_index == *day,
        }
    }
}

impl From<Option<u32>> for Scope {
    fn from(day: Option<u32>) -> Self {
        day.map_or(Self::Trip, Self::Day)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trip => write!(f, "Whole trip"),
            Self::Day(day) => write!(f, "Day {}", day + 1),
        }
    }
}

/// One labelled total in an aggregate view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerLine {
    pub label: String,
    pub total: f64,
}

impl LedgerLine {
    pub fn new(label: impl Into<String>, total: f64) -> Self {
        Self {
            label: label.into(),
            total,
        }
    }

    /// Whether the total is zero within [`AMOUNT_EPSILON`]
    pub fn is_zero(&self) -> bool {
        self.total.abs() < AMOUNT_EPSILON
    }
}
