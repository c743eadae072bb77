//! Storage layer for splitsheet
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation.

pub mod file_io;
pub mod participants;
pub mod rates;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use participants::ParticipantRepository;
pub use rates::RateRepository;
pub use transactions::TransactionRepository;

use crate::config::paths::SplitsheetPaths;
use crate::error::SplitError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SplitsheetPaths,
    pub participants: ParticipantRepository,
    pub transactions: TransactionRepository,
    pub rates: RateRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: SplitsheetPaths) -> Result<Self, SplitError> {
        paths.ensure_directories()?;

        Ok(Self {
            participants: ParticipantRepository::new(paths.participants_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            rates: RateRepository::new(paths.rates_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SplitsheetPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), SplitError> {
        self.participants.load()?;
        self.transactions.load()?;
        self.rates.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), SplitError> {
        self.participants.save()?;
        self.transactions.save()?;
        self.rates.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
