//! splitsheet - proportional money allocation for shared expenses
//!
//! Divides a transaction total among the participants of a shared sheet
//! under one of five split modes (evenly, selected, shares, percentage,
//! amounts), guaranteeing that the shares always add up to the total in the
//! currency's minor units.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `allocation`: apportionment, split modes, validation and redistribution
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, participants, splits, transactions)
//! - `storage`: JSON file storage layer
//! - `services`: Participant registry, rate previews and submission
//! - `display` / `export`: Terminal tables and CSV/JSON/YAML output
//! - `cli`: Command handlers for the `splitsheet` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use splitsheet::config::{paths::SplitsheetPaths, settings::Settings};
//!
//! let paths = SplitsheetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod allocation;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SplitError, SplitResult};
