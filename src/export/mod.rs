//! Export module for splitsheet
//!
//! Writes a split in machine-readable formats:
//! - CSV: one row per participant (spreadsheet-compatible)
//! - JSON: the full split with its validation verdict
//! - YAML: the same structure, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_split_csv;
pub use json::{export_split_json, ShareRecord, SplitExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_split_yaml;
