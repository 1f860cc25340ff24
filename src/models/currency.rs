//! Currency settings for the home-currency display
//!
//! Expenses are entered in the destination's local currency. A single
//! multiplier converts ledger totals into the traveler's home currency.

use serde::{Deserialize, Serialize};

/// Local-to-home conversion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// Local-currency-to-home-currency multiplier; zero disables conversion
    #[serde(default)]
    pub rate: f64,

    /// Home currency display symbol
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Home currency code, informational only
    #[serde(default = "default_code")]
    pub code: String,
}

fn default_symbol() -> String {
    "NT$".to_string()
}

fn default_code() -> String {
    "TWD".to_string()
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            rate: 0.0,
            symbol: default_symbol(),
            code: default_code(),
        }
    }
}

impl CurrencySettings {
    /// Whether a usable conversion rate is configured
    pub fn conversion_enabled(&self) -> bool {
        self.rate != 0.0 && self.rate.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_disables_conversion() {
        let settings = CurrencySettings::default();
        assert!(!settings.conversion_enabled());
        assert_eq!(settings.symbol, "NT$");
    }

    #[test]
    fn test_conversion_enabled() {
        let mut settings = CurrencySettings::default();
        settings.rate = 0.21;
        assert!(settings.conversion_enabled());
        settings.rate = f64::NAN;
        assert!(!settings.conversion_enabled());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: CurrencySettings = serde_json::from_str(r#"{"rate": 4.5}"#).unwrap();
        assert_eq!(settings.rate, 4.5);
        assert_eq!(settings.code, "TWD");
    }
}
