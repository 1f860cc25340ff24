//! JSON Export functionality
//!
//! Exports the complete trip state to JSON format with schema versioning.
//! Imports go through the same reconciliation as stored state, so an export
//! written by an older release restores with current defaults filled in.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::error::{TripError, TripResult};
use crate::ledger::total;
use crate::models::{
    AccommodationPlan, ConfigValue, CurrencySettings, ExpenseRecord, FlightPlan, TravelerRoster,
    TripBasics,
};
use crate::reconcile::reconcile_typed_value;
use crate::storage::expenses::decode_expense_list;
use crate::storage::{clamp_travelers, AppState, LoadWarning, Storage, StorageKey};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full trip export structure
///
/// The API credential is never part of an export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub trip: TripBasics,
    pub flights: FlightPlan,
    pub accommodations: AccommodationPlan,
    pub travelers: TravelerRoster,
    pub currency: CurrencySettings,
    pub expenses: Vec<ExpenseRecord>,

    #[serde(default)]
    pub itinerary: ConfigValue,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,
    pub traveler_count: usize,
    /// Sum of all expenses in local currency
    pub total_spend: f64,
    /// Highest day index that has an expense (0-based)
    pub last_expense_day: Option<u32>,
}

impl FullExport {
    /// Build an export from loaded state
    pub fn from_state(state: &AppState) -> Self {
        let metadata = ExportMetadata {
            expense_count: state.expenses.len(),
            traveler_count: state.travelers.len(),
            total_spend: total(&state.expenses),
            last_expense_day: state.expenses.iter().map(|e| e.day_index).max(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            trip: state.basics.clone(),
            flights: state.flights.clone(),
            accommodations: state.accommodations.clone(),
            travelers: state.travelers.clone(),
            currency: state.currency.clone(),
            expenses: state.expenses.clone(),
            itinerary: state.itinerary.clone(),
            metadata,
        }
    }

    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> TripResult<Self> {
        let loaded = storage.load_state()?;
        Ok(Self::from_state(&loaded.state))
    }
}

/// Export the full trip to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> TripResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TripError::Export(e.to_string()))?;

    Ok(())
}

/// State recovered from an export, with what had to be repaired
#[derive(Debug, Clone)]
pub struct ImportedState {
    pub state: AppState,
    pub warnings: Vec<LoadWarning>,
}

/// Import from a JSON export
///
/// Fails only when the text is not JSON or not a tripledger export at all.
/// Damaged sections fall back to defaults and are reported.
pub fn import_from_json(json_str: &str) -> TripResult<ImportedState> {
    let root = ConfigValue::parse(json_str).map_err(|e| TripError::Import(e.to_string()))?;
    import_value(&root)
}

/// Import from an already parsed export document
pub fn import_value(root: &ConfigValue) -> TripResult<ImportedState> {
    check_schema(root)?;

    let mut warnings = Vec::new();

    let mut basics: TripBasics = section(root, "trip", StorageKey::TripBasics, &mut warnings);
    if let Some(warning) = clamp_travelers(&mut basics) {
        warn!(key = %StorageKey::TripBasics, "import: {}", warning);
        warnings.push(LoadWarning {
            key: StorageKey::TripBasics,
            warning,
        });
    }
    let flights = section(root, "flights", StorageKey::Flights, &mut warnings);
    let accommodations = section(root, "accommodations", StorageKey::Accommodations, &mut warnings);
    let roster: TravelerRoster = section(root, "travelers", StorageKey::TravelerNames, &mut warnings);
    let currency = section(root, "currency", StorageKey::Currency, &mut warnings);
    let itinerary = section(root, "itinerary", StorageKey::Itinerary, &mut warnings);

    let mut expense_warnings = Vec::new();
    let expenses = root
        .get("expenses")
        .map(|list| decode_expense_list(list, &mut expense_warnings))
        .unwrap_or_default();
    for warning in expense_warnings {
        warn!(key = %StorageKey::Expenses, "import: {}", warning);
        warnings.push(LoadWarning {
            key: StorageKey::Expenses,
            warning,
        });
    }

    let travelers = roster.resized(basics.travelers as usize);
    let state = AppState {
        basics,
        flights,
        accommodations,
        travelers,
        expenses,
        currency,
        credential: Default::default(),
        itinerary,
    };

    Ok(ImportedState { state, warnings })
}

fn check_schema(root: &ConfigValue) -> TripResult<()> {
    if !root.is_map() {
        return Err(TripError::Import(format!(
            "expected an export object, found {}",
            root.kind()
        )));
    }

    let version = root
        .get("schema_version")
        .and_then(ConfigValue::as_str)
        .ok_or_else(|| TripError::Import("missing schema_version; not a tripledger export".into()))?;

    let major = |v: &str| v.split('.').next().unwrap_or_default().to_string();
    if major(version) != major(EXPORT_SCHEMA_VERSION) {
        return Err(TripError::Import(format!(
            "Schema version mismatch: expected {}, got {}",
            EXPORT_SCHEMA_VERSION, version
        )));
    }

    Ok(())
}

fn section<T>(
    root: &ConfigValue,
    name: &str,
    key: StorageKey,
    warnings: &mut Vec<LoadWarning>,
) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    let reconciled = reconcile_typed_value::<T>(root.get(name));
    for warning in reconciled.warnings {
        warn!(%key, "import: {}", warning);
        warnings.push(LoadWarning { key, warning });
    }
    reconciled.value
}
