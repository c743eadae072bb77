//! Exchange rate repository for JSON storage
//!
//! Manages loading and saving rates to rates.json. Rates are keyed by
//! (date, source, target); setting a rate that already exists replaces it.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::SplitError;
use crate::models::ExchangeRate;
use crate::services::rates::RateProvider;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RateData {
    rates: Vec<ExchangeRate>,
}

/// Repository for exchange rate persistence
pub struct RateRepository {
    path: PathBuf,
    data: RwLock<Vec<ExchangeRate>>,
}

impl RateRepository {
    /// Create a new rate repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load rates from disk
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: RateData = read_json(&self.path)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data.rates;
        Ok(())
    }

    /// Save rates to disk, ordered by date then currency pair
    pub fn save(&self) -> Result<(), SplitError> {
        let mut rates = self.get_all()?;
        rates.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.source.cmp(&b.source))
                .then_with(|| a.target.cmp(&b.target))
        });
        write_json_atomic(&self.path, &RateData { rates })
    }

    /// All stored rates
    pub fn get_all(&self) -> Result<Vec<ExchangeRate>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Insert a rate, replacing any rate for the same date and pair
    pub fn upsert(&self, rate: ExchangeRate) -> Result<(), SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.retain(|r| !r.applies_to(rate.date, &rate.source, &rate.target));
        data.push(rate);
        Ok(())
    }

    /// Find the rate for a date and pair
    pub fn find(
        &self,
        date: NaiveDate,
        source: &str,
        target: &str,
    ) -> Result<Option<ExchangeRate>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .iter()
            .find(|r| r.applies_to(date, source, target))
            .cloned())
    }
}

impl RateProvider for RateRepository {
    fn rate(&self, date: NaiveDate, source: &str, target: &str) -> Option<ExchangeRate> {
        // A poisoned lock means the rate is unavailable, like any other miss
        self.find(date, source, target).ok().flatten()
    }
}
