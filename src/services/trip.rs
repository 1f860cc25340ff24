//! Trip service
//!
//! Updates to trip basics, the traveler roster and currency settings.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{TripError, TripResult};
use crate::models::{CurrencySettings, TravelStyle, TravelerRoster, TripBasics, MAX_TRAVELERS};
use crate::storage::{Storage, StorageKey};

/// Partial update of the trip basics; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TripUpdate {
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub days: Option<u32>,
    pub travelers: Option<u32>,
    pub budget: Option<f64>,
    pub style: Option<TravelStyle>,
    pub interests: Option<Vec<String>>,
}

/// Partial update of the currency settings
#[derive(Debug, Clone, Default)]
pub struct CurrencyUpdate {
    pub rate: Option<f64>,
    pub symbol: Option<String>,
    pub code: Option<String>,
}

/// Service for trip-level settings
pub struct TripService<'a> {
    storage: &'a Storage,
}

impl<'a> TripService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn basics(&self) -> TripResult<TripBasics> {
        Ok(self.storage.load_basics()?.value)
    }

    /// Apply a partial update to the trip basics
    ///
    /// Changing the traveler count resizes the stored roster as well.
    pub fn update(&self, update: TripUpdate) -> TripResult<TripBasics> {
        if let Some(count) = update.travelers {
            check_traveler_count(count)?;
        }
        let mut basics = self.basics()?;

        if let Some(destination) = update.destination {
            basics.destination = destination.trim().to_string();
        }
        if let Some(origin) = update.origin {
            basics.origin = origin.trim().to_string();
        }
        if let Some(start) = update.start_date {
            basics.start_date = Some(start);
        }
        if let Some(days) = update.days {
            if days == 0 {
                return Err(TripError::Validation("A trip lasts at least one day".into()));
            }
            basics.days = days;
        }
        if let Some(budget) = update.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(TripError::Validation("Budget must be zero or more".into()));
            }
            basics.budget = Some(budget);
        }
        if let Some(style) = update.style {
            basics.style = style;
        }
        if let Some(interests) = update.interests {
            basics.interests = interests
                .into_iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect();
        }

        self.storage.save_basics(&basics)?;

        if let Some(count) = update.travelers {
            self.set_traveler_count(count)?;
            basics.travelers = count;
        }

        info!(destination = %basics.destination, days = basics.days, "updated trip");
        Ok(basics)
    }

    /// The roster, sized to the configured traveler count
    pub fn travelers(&self) -> TripResult<TravelerRoster> {
        let basics = self.basics()?;
        let roster = self.storage.load::<TravelerRoster>(StorageKey::TravelerNames)?.value;
        Ok(roster.resized(basics.travelers as usize))
    }

    /// Change the traveler count, keeping existing names
    pub fn set_traveler_count(&self, count: u32) -> TripResult<TravelerRoster> {
        check_traveler_count(count)?;

        let mut basics = self.basics()?;
        basics.travelers = count;
        self.storage.save_basics(&basics)?;

        let roster = self.storage.load::<TravelerRoster>(StorageKey::TravelerNames)?.value;
        let roster = roster.resized(count as usize);
        self.storage.save_travelers(&roster)?;
        Ok(roster)
    }

    /// Replace traveler names; the count follows the number of names
    pub fn set_traveler_names(&self, names: Vec<String>) -> TripResult<TravelerRoster> {
        let names: Vec<String> = names.iter().map(|n| n.trim().to_string()).collect();
        check_traveler_count(u32::try_from(names.len()).unwrap_or(u32::MAX))?;
        if names.iter().any(String::is_empty) {
            return Err(TripError::Validation("Traveler names cannot be blank".into()));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(TripError::Validation(format!(
                    "Traveler '{}' is listed twice",
                    name
                )));
            }
        }

        let mut basics = self.basics()?;
        basics.travelers = names.len() as u32;
        self.storage.save_basics(&basics)?;

        let roster = TravelerRoster::new(names);
        self.storage.save_travelers(&roster)?;
        Ok(roster)
    }

    pub fn currency(&self) -> TripResult<CurrencySettings> {
        Ok(self.storage.load::<CurrencySettings>(StorageKey::Currency)?.value)
    }

    /// Apply a partial update to the currency settings
    pub fn update_currency(&self, update: CurrencyUpdate) -> TripResult<CurrencySettings> {
        let mut currency = self.currency()?;

        if let Some(rate) = update.rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(TripError::Validation(
                    "Exchange rate must be zero (disabled) or a positive number".into(),
                ));
            }
            currency.rate = rate;
        }
        if let Some(symbol) = update.symbol {
            currency.symbol = symbol.trim().to_string();
        }
        if let Some(code) = update.code {
            currency.code = code.trim().to_uppercase();
        }

        self.storage.save_currency(&currency)?;
        Ok(currency)
    }
}

fn check_traveler_count(count: u32) -> TripResult<()> {
    if count == 0 {
        return Err(TripError::Validation("At least one traveler is required".into()));
    }
    if count > MAX_TRAVELERS {
        return Err(TripError::Validation(format!(
            "At most {} travelers are supported, got {}",
            MAX_TRAVELERS, count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TripPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_update_basics() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TripService::new(&storage);

        let basics = service
            .update(TripUpdate {
                destination: Some(" Kyoto ".into()),
                days: Some(4),
                interests: Some(vec!["temples".into(), " ".into()]),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(basics.destination, "Kyoto");
        assert_eq!(basics.interests, vec!["temples"]);
        assert_eq!(service.basics().unwrap().days, 4);
    }

    #[test]
    fn test_zero_days_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TripService::new(&storage);
        let err = service
            .update(TripUpdate {
                days: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_traveler_count_and_names() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TripService::new(&storage);

        service
            .set_traveler_names(vec!["Ann".into(), "Bo".into()])
            .unwrap();
        let roster = service.set_traveler_count(3).unwrap();
        assert_eq!(roster.names(), &["Ann", "Bo", "Traveler 3"]);
        assert_eq!(service.basics().unwrap().travelers, 3);

        assert!(service.set_traveler_count(0).is_err());
        assert!(service
            .set_traveler_names(vec!["Ann".into(), "Ann".into()])
            .is_err());
    }

    #[test]
    fn test_traveler_count_upper_bound() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TripService::new(&storage);

        let err = service.set_traveler_count(4_000_000_000).unwrap_err();
        assert!(err.is_validation());
        assert!(service.set_traveler_count(MAX_TRAVELERS).is_ok());

        let err = service
            .update(TripUpdate {
                destination: Some("Oslo".into()),
                travelers: Some(MAX_TRAVELERS + 1),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.basics().unwrap().destination, "");

        let too_many = (0..=MAX_TRAVELERS).map(|i| format!("T{}", i)).collect();
        assert!(service.set_traveler_names(too_many).is_err());
    }

    #[test]
    fn test_update_keeps_unknown_stored_keys() {
        let (_temp_dir, storage) = create_test_storage();
        let path = storage.store().path_for(StorageKey::TripBasics);
        std::fs::write(&path, r#"{"destination": "X", "legacy": 1}"#).unwrap();

        TripService::new(&storage)
            .update(TripUpdate {
                days: Some(4),
                ..Default::default()
            })
            .unwrap();

        let stale = storage.stale_keys().unwrap();
        assert_eq!(stale, vec![(StorageKey::TripBasics, vec!["legacy".to_string()])]);
    }

    #[test]
    fn test_update_currency() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TripService::new(&storage);

        let currency = service
            .update_currency(CurrencyUpdate {
                rate: Some(0.21),
                code: Some("twd".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(currency.rate, 0.21);
        assert_eq!(currency.code, "TWD");

        assert!(service
            .update_currency(CurrencyUpdate {
                rate: Some(-1.0),
                ..Default::default()
            })
            .is_err());
    }
}
