//! Scope filtering and aggregation over expense records
//!
//! All functions are pure: they borrow their inputs and return new values.

use std::collections::HashMap;

use crate::models::ExpenseRecord;

use super::{LedgerLine, Scope};

/// Records belonging to `scope`
pub fn filter_by_scope(records: &[ExpenseRecord], scope: Scope) -> Vec<ExpenseRecord> {
    records
        .iter()
        .filter(|record| scope.contains(record))
        .cloned()
        .collect()
}

/// Sum of raw amounts per category, in order of first occurrence
pub fn aggregate_by_category(records: &[ExpenseRecord]) -> Vec<LedgerLine> {
    let mut lines = LineAccumulator::default();
    for record in records {
        lines.add(&record.category, record.amount.effective());
    }
    lines.into_lines()
}

/// Consumed share per traveler
///
/// Every roster traveler starts at zero. Each record adds
/// `amount / max(1, splitters)` to each of its splitters; a record without
/// splitters is charged to its payer, which for a go-dutch record is the
/// `go-dutch` line. Splitters missing from the roster are appended in order
/// of first appearance.
pub fn aggregate_by_traveler(records: &[ExpenseRecord], travelers: &[String]) -> Vec<LedgerLine> {
    let mut lines = LineAccumulator::default();
    for traveler in travelers {
        lines.add(traveler, 0.0);
    }

    for record in records {
        let share = record.split_share();
        for splitter in record.effective_splitters() {
            lines.add(splitter, share);
        }
    }

    lines.into_lines()
}

/// Sum of all amounts; zero for no records
pub fn total(records: &[ExpenseRecord]) -> f64 {
    records.iter().map(|record| record.amount.effective()).sum()
}

/// Convert a local amount into the home currency
///
/// Rounds half away from zero to whole home-currency units. Returns `None`
/// when the rate is zero or not finite, meaning conversion is unavailable.
pub fn convert(amount: f64, rate: f64) -> Option<f64> {
    if rate == 0.0 || !rate.is_finite() {
        return None;
    }
    let converted = (amount * rate).round();
    converted.is_finite().then_some(converted)
}

/// Insertion-ordered label totals
#[derive(Default)]
pub(super) struct LineAccumulator {
    index: HashMap<String, usize>,
    lines: Vec<LedgerLine>,
}

impl LineAccumulator {
    pub(super) fn add(&mut self, label: &str, amount: f64) {
        match self.index.get(label) {
            Some(&i) => self.lines[i].total += amount,
            None => {
                self.index.insert(label.to_string(), self.lines.len());
                self.lines.push(LedgerLine::new(label, amount));
            }
        }
    }

    pub(super) fn into_lines(self) -> Vec<LedgerLine> {
        self.lines
    }
}
