//! Pie-chart geometry for category breakdowns
//!
//! Slices start at 12 o'clock (0 degrees) and run clockwise. Only positive
//! totals get a slice.

use serde::Serialize;

use crate::ledger::LedgerLine;

/// One wedge of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    /// Share of the whole, 0.0 to 1.0
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Compute pie slices for the positive lines
///
/// Returns nothing when there is no positive total. The last slice always
/// ends exactly at 360 degrees.
pub fn pie_slices(lines: &[LedgerLine]) -> Vec<PieSlice> {
    let positive: Vec<&LedgerLine> = lines
        .iter()
        .filter(|line| line.total.is_finite() && line.total > 0.0)
        .collect();
    let whole: f64 = positive.iter().map(|line| line.total).sum();
    if whole <= 0.0 {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(positive.len());
    let mut cursor = 0.0;
    for (i, line) in positive.iter().enumerate() {
        let fraction = line.total / whole;
        let end = if i + 1 == positive.len() {
            360.0
        } else {
            cursor + fraction * 360.0
        };
        slices.push(PieSlice {
            label: line.label.clone(),
            fraction,
            start_angle: cursor,
            end_angle: end,
        });
        cursor = end;
    }
    slices
}
