//! Configuration module for splitsheet
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (sheet currency, default split mode)

pub mod paths;
pub mod settings;

pub use paths::SplitsheetPaths;
pub use settings::Settings;
