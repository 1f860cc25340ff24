//! Storage layer for tripledger
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Every document passes through reconciliation on the way in, so
//! loading never fails because of what a file contains, only because it
//! cannot be read at all.

pub mod expenses;
pub mod file_io;
pub mod keys;

pub use expenses::ExpenseRepository;
pub use file_io::{read_text, write_json_atomic};
pub use keys::{KeyValueStore, StorageKey};

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::paths::TripPaths;
use crate::error::TripError;
use crate::models::{
    AccommodationPlan, ApiCredential, ConfigValue, CurrencySettings, ExpenseRecord, FlightPlan,
    TravelerRoster, TripBasics, MAX_TRAVELERS,
};
use crate::reconcile::{
    carry_stale_keys, reconcile_typed, stale_keys, ReconcileWarning, TypedReconciled,
};

/// Everything the planner persists, reconciled against current defaults
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub basics: TripBasics,
    pub flights: FlightPlan,
    pub accommodations: AccommodationPlan,
    pub travelers: TravelerRoster,
    pub expenses: Vec<ExpenseRecord>,
    pub currency: CurrencySettings,
    pub credential: ApiCredential,
    /// Last generated itinerary, kept as loosely typed data
    pub itinerary: ConfigValue,
}

/// A reconciliation warning tied to the storage entry it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadWarning {
    pub key: StorageKey,
    pub warning: ReconcileWarning,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.warning)
    }
}

/// Loaded state plus every problem that was repaired along the way
#[derive(Debug, Clone)]
pub struct LoadedState {
    pub state: AppState,
    pub warnings: Vec<LoadWarning>,
}

/// Main storage coordinator
pub struct Storage {
    paths: TripPaths,
    store: KeyValueStore,
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TripPaths) -> Result<Self, TripError> {
        paths.ensure_directories()?;

        let store = KeyValueStore::new(paths.data_dir());
        Ok(Self {
            expenses: ExpenseRepository::new(store.clone()),
            store,
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TripPaths {
        &self.paths
    }

    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }

    /// Load and reconcile a single typed entry
    pub fn load<T>(&self, key: StorageKey) -> Result<TypedReconciled<T>, TripError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let raw = self.store.get_raw(key)?;
        let reconciled = reconcile_typed::<T>(raw.as_deref());
        for warning in &reconciled.warnings {
            warn!(%key, "{}", warning);
        }
        Ok(reconciled)
    }

    /// Load the trip basics with the traveler count held to [`MAX_TRAVELERS`]
    pub fn load_basics(&self) -> Result<TypedReconciled<TripBasics>, TripError> {
        let mut reconciled = self.load::<TripBasics>(StorageKey::TripBasics)?;
        if let Some(warning) = clamp_travelers(&mut reconciled.value) {
            warn!(key = %StorageKey::TripBasics, "{}", warning);
            reconciled.warnings.push(warning);
        }
        Ok(reconciled)
    }

    /// Load every entry
    ///
    /// The traveler roster is resized to the configured traveler count.
    pub fn load_state(&self) -> Result<LoadedState, TripError> {
        let mut warnings = Vec::new();

        let loaded_basics = self.load_basics()?;
        warnings.extend(loaded_basics.warnings.into_iter().map(|warning| LoadWarning {
            key: StorageKey::TripBasics,
            warning,
        }));
        let basics = loaded_basics.value;
        let flights = self.load_collecting(StorageKey::Flights, &mut warnings)?;
        let accommodations = self.load_collecting(StorageKey::Accommodations, &mut warnings)?;
        let stored_roster: TravelerRoster =
            self.load_collecting(StorageKey::TravelerNames, &mut warnings)?;
        let currency = self.load_collecting(StorageKey::Currency, &mut warnings)?;
        let credential = self.load_collecting(StorageKey::ApiCredential, &mut warnings)?;
        let itinerary = self.load_collecting(StorageKey::Itinerary, &mut warnings)?;

        for warning in self.expenses.load()? {
            warn!(key = %StorageKey::Expenses, "{}", warning);
            warnings.push(LoadWarning {
                key: StorageKey::Expenses,
                warning,
            });
        }

        let travelers = stored_roster.resized(basics.travelers as usize);
        let state = AppState {
            basics,
            flights,
            accommodations,
            travelers,
            expenses: self.expenses.get_all()?,
            currency,
            credential,
            itinerary,
        };

        debug!(
            expenses = state.expenses.len(),
            warnings = warnings.len(),
            "loaded trip state"
        );
        Ok(LoadedState { state, warnings })
    }

    fn load_collecting<T>(
        &self,
        key: StorageKey,
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<T, TripError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let reconciled = self.load::<T>(key)?;
        warnings.extend(
            reconciled
                .warnings
                .into_iter()
                .map(|warning| LoadWarning { key, warning }),
        );
        Ok(reconciled.value)
    }

    pub fn save_basics(&self, basics: &TripBasics) -> Result<(), TripError> {
        self.put_keeping_stale(StorageKey::TripBasics, basics)
    }

    pub fn save_flights(&self, flights: &FlightPlan) -> Result<(), TripError> {
        self.put_keeping_stale(StorageKey::Flights, flights)
    }

    pub fn save_accommodations(&self, plan: &AccommodationPlan) -> Result<(), TripError> {
        self.put_keeping_stale(StorageKey::Accommodations, plan)
    }

    pub fn save_travelers(&self, roster: &TravelerRoster) -> Result<(), TripError> {
        self.store.put(StorageKey::TravelerNames, roster)
    }

    pub fn save_currency(&self, currency: &CurrencySettings) -> Result<(), TripError> {
        self.put_keeping_stale(StorageKey::Currency, currency)
    }

    pub fn save_credential(&self, credential: &ApiCredential) -> Result<(), TripError> {
        self.put_keeping_stale(StorageKey::ApiCredential, credential)
    }

    pub fn clear_credential(&self) -> Result<(), TripError> {
        self.store.remove(StorageKey::ApiCredential)
    }

    pub fn save_itinerary(&self, itinerary: &ConfigValue) -> Result<(), TripError> {
        self.store.put(StorageKey::Itinerary, itinerary)
    }

    /// Write every entry except the API credential
    pub fn save_state(&self, state: &AppState) -> Result<(), TripError> {
        self.save_basics(&state.basics)?;
        self.save_flights(&state.flights)?;
        self.save_accommodations(&state.accommodations)?;
        self.save_travelers(&state.travelers)?;
        self.save_currency(&state.currency)?;
        self.save_itinerary(&state.itinerary)?;
        self.expenses.replace_all(state.expenses.clone())?;
        self.expenses.save()?;
        Ok(())
    }

    /// Stored keys the current schema no longer knows, per entry
    ///
    /// Reconciliation keeps such keys; this only reports them.
    pub fn stale_keys(&self) -> Result<Vec<(StorageKey, Vec<String>)>, TripError> {
        let mut report = vec![
            (StorageKey::TripBasics, self.stale_for::<TripBasics>(StorageKey::TripBasics)?),
            (StorageKey::Flights, self.stale_for::<FlightPlan>(StorageKey::Flights)?),
            (
                StorageKey::Accommodations,
                self.stale_for::<AccommodationPlan>(StorageKey::Accommodations)?,
            ),
            (StorageKey::Currency, self.stale_for::<CurrencySettings>(StorageKey::Currency)?),
            (
                StorageKey::ApiCredential,
                self.stale_for::<ApiCredential>(StorageKey::ApiCredential)?,
            ),
        ];
        report.retain(|(_, keys)| !keys.is_empty());
        Ok(report)
    }

    fn stale_for<T: Serialize + Default>(&self, key: StorageKey) -> Result<Vec<String>, TripError> {
        let Some(stored) = self.stored_tree(key)? else {
            return Ok(Vec::new());
        };
        let default = ConfigValue::from_serializable(&T::default())?;
        Ok(stale_keys(&default, &stored))
    }

    /// Write a typed entry, keeping stored keys the current schema does not know
    fn put_keeping_stale<T: Serialize + Default>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), TripError> {
        let mut fresh = ConfigValue::from_serializable(value)?;
        if let Some(stored) = self.stored_tree(key)? {
            let default = ConfigValue::from_serializable(&T::default())?;
            carry_stale_keys(&default, &stored, &mut fresh);
        }
        self.store.put(key, &fresh)
    }

    /// The stored document for `key`, if there is one and it parses
    fn stored_tree(&self, key: StorageKey) -> Result<Option<ConfigValue>, TripError> {
        Ok(self
            .store
            .get_raw(key)?
            .and_then(|raw| ConfigValue::parse(&raw).ok()))
    }

    /// Write default documents for entries that have never been stored
    pub fn write_missing_defaults(&self) -> Result<Vec<StorageKey>, TripError> {
        let mut written = Vec::new();
        if !self.store.contains(StorageKey::TripBasics) {
            self.save_basics(&TripBasics::default())?;
            written.push(StorageKey::TripBasics);
        }
        if !self.store.contains(StorageKey::TravelerNames) {
            self.save_travelers(&TravelerRoster::with_count(TripBasics::default().travelers as usize))?;
            written.push(StorageKey::TravelerNames);
        }
        if !self.store.contains(StorageKey::Currency) {
            self.save_currency(&CurrencySettings::default())?;
            written.push(StorageKey::Currency);
        }
        if !self.store.contains(StorageKey::Expenses) {
            self.store.put(StorageKey::Expenses, &Vec::<ExpenseRecord>::new())?;
            written.push(StorageKey::Expenses);
        }
        Ok(written)
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

/// Hold the traveler count to [`MAX_TRAVELERS`]
pub(crate) fn clamp_travelers(basics: &mut TripBasics) -> Option<ReconcileWarning> {
    if basics.travelers <= MAX_TRAVELERS {
        return None;
    }
    let found = basics.travelers;
    basics.travelers = MAX_TRAVELERS;
    Some(ReconcileWarning::Clamped {
        path: "travelers".to_string(),
        found: u64::from(found),
        limit: u64::from(MAX_TRAVELERS),
    })
}
