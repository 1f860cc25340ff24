//! Trip parameters, flights and accommodations
//!
//! These are the persisted planning inputs. Every field has a serde default
//! so the reconciler can fill anything an older stored blob is missing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Travel pace preference passed to the itinerary generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Relaxed,
    #[default]
    Balanced,
    Packed,
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relaxed => write!(f, "relaxed"),
            Self::Balanced => write!(f, "balanced"),
            Self::Packed => write!(f, "packed"),
        }
    }
}

/// Basic trip data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripBasics {
    #[serde(default)]
    pub destination: String,

    #[serde(default)]
    pub origin: String,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Trip length in days
    #[serde(default = "default_days")]
    pub days: u32,

    /// Configured traveler count; the roster follows it
    #[serde(default = "default_travelers")]
    pub travelers: u32,

    /// Total budget in local currency, if any
    #[serde(default)]
    pub budget: Option<f64>,

    #[serde(default)]
    pub style: TravelStyle,

    #[serde(default)]
    pub interests: Vec<String>,
}

fn default_days() -> u32 {
    5
}

fn default_travelers() -> u32 {
    2
}

impl Default for TripBasics {
    fn default() -> Self {
        Self {
            destination: String::new(),
            origin: String::new(),
            start_date: None,
            days: default_days(),
            travelers: default_travelers(),
            budget: None,
            style: TravelStyle::default(),
            interests: Vec::new(),
        }
    }
}

impl TripBasics {
    /// Calendar date of a 0-based trip day, when a start date is set
    pub fn date_of_day(&self, day_index: u32) -> Option<NaiveDate> {
        self.start_date
            .and_then(|start| start.checked_add_days(chrono::Days::new(day_index as u64)))
    }
}

/// Direction of a flight relative to the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlightDirection {
    #[default]
    Outbound,
    Return,
}

/// A booked flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    #[serde(default)]
    pub direction: FlightDirection,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub airport: String,
}

/// Flight list wrapper so the stored document is a mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlightPlan {
    #[serde(default)]
    pub flights: Vec<Flight>,
}

/// A place to stay for a range of trip days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// First night, as a 0-based trip day
    #[serde(default)]
    pub check_in_day: u32,
    /// Departure day, as a 0-based trip day
    #[serde(default)]
    pub check_out_day: u32,
}

/// Accommodation list wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AccommodationPlan {
    #[serde(default)]
    pub stays: Vec<Accommodation>,
}

impl AccommodationPlan {
    /// The stay covering the night of `day_index`
    pub fn stay_for_night(&self, day_index: u32) -> Option<&Accommodation> {
        self.stays
            .iter()
            .find(|s| s.check_in_day <= day_index && day_index < s.check_out_day)
    }
}

/// Generative-model API credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiCredential {
    #[serde(default)]
    pub api_key: String,
}

impl ApiCredential {
    pub fn is_set(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Key with everything but the last four characters hidden
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}
