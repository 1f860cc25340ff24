//! Export module for tripledger
//!
//! Provides complete data export functionality in multiple formats:
//! - CSV: expense records (spreadsheet-compatible)
//! - JSON: machine-readable full trip export
//! - YAML: human-readable full trip export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_expenses_csv, write_expenses_csv};
pub use json::{
    export_full_json, import_from_json, import_value, FullExport, ImportedState,
    EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_full_yaml, import_from_yaml};
