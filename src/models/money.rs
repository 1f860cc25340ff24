//! Amount type for local-currency expense values
//!
//! Expense shares are fractional (300 split three ways is 100 each, 100 split
//! three ways is not representable in cents), so amounts are kept as `f64`
//! and only rounded when displayed or converted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// A monetary amount in the trip's local currency
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// The raw stored value, which may be non-finite for corrupt input
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// The value used for aggregation: non-finite input counts as zero
    pub fn effective(&self) -> f64 {
        if self.0.is_finite() {
            self.0
        } else {
            0.0
        }
    }

    pub fn is_zero(&self) -> bool {
        self.effective() == 0.0
    }

    pub fn is_positive(&self) -> bool {
        self.effective() > 0.0
    }

    /// Parse an amount from user input
    ///
    /// Accepts "12", "12.50", "1,200.50" and an optional leading symbol such as
    /// "$12" or "¥1200".
    pub fn parse(s: &str) -> Result<Self, AmountParseError> {
        let trimmed = s.trim();
        let body = trimmed.trim_start_matches(|c: char| {
            !(c.is_ascii_digit() || c == '-' || c == '.' || c == '+')
        });
        let cleaned: String = body.chars().filter(|c| *c != ',' && *c != '_').collect();

        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self)
            .ok_or_else(|| AmountParseError::InvalidFormat(s.to_string()))
    }

    /// Format with a currency symbol, rounded to whole units
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        format_units(self.effective(), symbol)
    }
}

/// Format a value with a symbol, rounded to whole units with thousands separators
pub fn format_units(value: f64, symbol: &str) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-{}{}", symbol, grouped)
    } else {
        format!("{}{}", symbol, grouped)
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Lenient: numbers pass through, numeric strings are parsed and anything
    /// else becomes zero so one bad record cannot poison a whole ledger.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let value = match raw {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => Amount::parse(&s).map(|a| a.0).unwrap_or(0.0),
            _ => 0.0,
        };
        Ok(Self(value))
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.effective();
        if v.fract() == 0.0 {
            write!(f, "{}", v as i64)
        } else {
            write!(f, "{:.2}", v)
        }
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.effective() + other.effective())
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.effective() + other.effective();
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.effective() - other.effective())
    }
}

impl Mul<f64> for Amount {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.effective() * rhs)
    }
}

impl Div<f64> for Amount {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self(self.effective() / rhs)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, m| acc + m)
    }
}

/// Error type for amount parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    InvalidFormat(String),
}

impl fmt::Display for AmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountParseError::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
        }
    }
}

impl std::error::Error for AmountParseError {}
