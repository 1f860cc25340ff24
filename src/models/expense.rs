//! Expense record model
//!
//! One line in the trip ledger: something bought at a given itinerary stop,
//! paid by one traveler (or split at the till) and shared by a set of
//! travelers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Amount;

/// Category labels offered by the planner
pub const KNOWN_CATEGORIES: &[&str] = &[
    "food",
    "entertainment",
    "tickets",
    "shopping",
    "transport",
    "tips",
    "other",
];

/// Stored marker for a go-dutch payer
pub const GO_DUTCH_MARKER: &str = "__go_dutch__";

/// Ledger label for a go-dutch payer
pub const GO_DUTCH_LABEL: &str = "go-dutch";

/// Who paid for an expense
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payer {
    /// A single traveler paid the full amount
    Traveler(String),
    /// Every splitter paid their own share at the point of purchase
    GoDutch,
}

impl Payer {
    pub fn traveler(name: impl Into<String>) -> Self {
        Self::Traveler(name.into())
    }

    pub fn is_go_dutch(&self) -> bool {
        matches!(self, Self::GoDutch)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Traveler(name) => Some(name),
            Self::GoDutch => None,
        }
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traveler(name) => write!(f, "{}", name),
            Self::GoDutch => f.write_str(GO_DUTCH_LABEL),
        }
    }
}

impl Serialize for Payer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Traveler(name) => serializer.serialize_str(name),
            Self::GoDutch => serializer.serialize_str(GO_DUTCH_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for Payer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == GO_DUTCH_MARKER {
            Ok(Self::GoDutch)
        } else {
            Ok(Self::Traveler(raw))
        }
    }
}

/// A single shared expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// Unique identifier, assigned at creation
    pub id: ExpenseId,

    /// Itinerary day this expense belongs to (0-based)
    pub day_index: u32,

    /// Timeline entry within the day (0-based)
    #[serde(default)]
    pub timeline_index: u32,

    /// What was bought
    pub item: String,

    /// Category label, usually one of [`KNOWN_CATEGORIES`]
    #[serde(default = "default_category")]
    pub category: String,

    /// Amount in local currency
    pub amount: Amount,

    /// Who paid
    pub payer: Payer,

    /// Who shares the cost
    #[serde(default)]
    pub splitters: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// When the record was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_category() -> String {
    "other".to_string()
}

impl ExpenseRecord {
    /// Create a new expense paid by a single traveler
    pub fn new(
        day_index: u32,
        timeline_index: u32,
        item: impl Into<String>,
        category: impl Into<String>,
        amount: Amount,
        payer: Payer,
        splitters: Vec<String>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            day_index,
            timeline_index,
            item: item.into(),
            category: category.into(),
            amount,
            payer,
            splitters,
            note: None,
            created_at: Utc::now(),
        }
    }

    /// Create a go-dutch expense from a per-person amount
    ///
    /// The stored amount is the per-person amount times the number of
    /// splitters.
    pub fn go_dutch(
        day_index: u32,
        timeline_index: u32,
        item: impl Into<String>,
        category: impl Into<String>,
        per_person: Amount,
        splitters: Vec<String>,
    ) -> Self {
        let heads = splitters.len().max(1) as f64;
        Self::new(
            day_index,
            timeline_index,
            item,
            category,
            per_person * heads,
            Payer::GoDutch,
            splitters,
        )
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }

    /// The travelers who actually share this expense
    ///
    /// An empty splitter list falls back to the payer. For a go-dutch expense
    /// that is the [`GO_DUTCH_LABEL`] line, so the amount is never lost.
    pub fn effective_splitters(&self) -> Vec<&str> {
        if !self.splitters.is_empty() {
            return self.splitters.iter().map(String::as_str).collect();
        }
        match &self.payer {
            Payer::Traveler(name) => vec![name.as_str()],
            Payer::GoDutch => vec![GO_DUTCH_LABEL],
        }
    }

    /// Per-person share; the divisor is never below one
    pub fn split_share(&self) -> f64 {
        self.amount.effective() / self.splitters.len().max(1) as f64
    }

    pub fn is_known_category(&self) -> bool {
        KNOWN_CATEGORIES.contains(&self.category.as_str())
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} #{} {} [{}] {}",
            self.day_index + 1,
            self.timeline_index + 1,
            self.item,
            self.category,
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_expense() {
        let e = ExpenseRecord::new(
            0,
            2,
            "Ramen",
            "food",
            Amount::new(300.0),
            Payer::traveler("A"),
            names(&["A", "B"]),
        );
        assert_eq!(e.day_index, 0);
        assert_eq!(e.timeline_index, 2);
        assert_eq!(e.split_share(), 150.0);
        assert!(e.is_known_category());
        assert!(e.note.is_none());
    }

    #[test]
    fn test_go_dutch_multiplies() {
        let e = ExpenseRecord::go_dutch(1, 0, "Museum", "tickets", Amount::new(20.0), names(&["A", "B", "C"]));
        assert_eq!(e.amount.value(), 60.0);
        assert!(e.payer.is_go_dutch());
        assert_eq!(e.split_share(), 20.0);
    }

    #[test]
    fn test_empty_splitters_fall_back_to_payer() {
        let e = ExpenseRecord::new(0, 0, "Taxi", "transport", Amount::new(80.0), Payer::traveler("B"), vec![]);
        assert_eq!(e.effective_splitters(), vec!["B"]);
        assert_eq!(e.split_share(), 80.0);
    }

    #[test]
    fn test_go_dutch_without_splitters_keeps_payer_line() {
        let e = ExpenseRecord::new(0, 0, "Tea", "food", Amount::new(90.0), Payer::GoDutch, vec![]);
        assert_eq!(e.effective_splitters(), vec![GO_DUTCH_LABEL]);
        assert_eq!(e.split_share(), 90.0);
    }

    #[test]
    fn test_with_note_drops_blank() {
        let e = ExpenseRecord::new(0, 0, "x", "other", Amount::new(1.0), Payer::traveler("A"), vec![])
            .with_note("   ");
        assert!(e.note.is_none());
        let e = e.with_note("receipt lost");
        assert_eq!(e.note.as_deref(), Some("receipt lost"));
    }

    #[test]
    fn test_camel_case_serialization() {
        let e = ExpenseRecord::go_dutch(2, 1, "Boat", "transport", Amount::new(10.0), names(&["A", "B"]));
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["dayIndex"], 2);
        assert_eq!(json["timelineIndex"], 1);
        assert_eq!(json["payer"], GO_DUTCH_MARKER);
        assert!(json.get("note").is_none());

        let back: ExpenseRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_lenient_record() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "dayIndex": 0,
            "item": "Snacks",
            "amount": "not a number",
            "payer": "A"
        }"#;
        let e: ExpenseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(e.amount.value(), 0.0);
        assert_eq!(e.category, "other");
        assert!(e.splitters.is_empty());
        assert_eq!(e.payer, Payer::traveler("A"));
    }
}
