//! Transaction repository for JSON storage
//!
//! Manages loading and saving submitted transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{ParticipantId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for txn in file_data.transactions {
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk, oldest first
    pub fn save(&self) -> Result<(), SplitError> {
        let file_data = TransactionData {
            transactions: self.sorted(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then_with(|| a.created_at.cmp(&b.created_at))
            })?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&id).cloned())
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, SplitError> {
        self.sorted(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        })
    }

    /// Transactions a participant paid for, newest first
    pub fn get_by_payer(&self, payer_id: ParticipantId) -> Result<Vec<Transaction>, SplitError> {
        let mut all = self.get_all()?;
        all.retain(|t| t.payer_id == payer_id);
        Ok(all)
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }

    fn sorted<F>(&self, compare: F) -> Result<Vec<Transaction>, SplitError>
    where
        F: FnMut(&Transaction, &Transaction) -> std::cmp::Ordering,
    {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let mut txns: Vec<_> = data.values().cloned().collect();
        txns.sort_by(compare);
        Ok(txns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Share, SplitMode};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn txn(payer: ParticipantId, day: u32) -> Transaction {
        let money = Money::new(1000, 2, "USD");
        Transaction::new(
            payer,
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            money.clone(),
            SplitMode::Evenly,
            vec![Share::new(payer, money)],
        )
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, repo) = create_test_repo();
        let payer = ParticipantId::new();
        let first = txn(payer, 1);
        repo.upsert(first.clone()).unwrap();
        repo.upsert(txn(payer, 2)).unwrap();
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(repo.path.clone());
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 2);
        assert_eq!(reloaded.get(first.id).unwrap().unwrap().money, first.money);
    }

    #[test]
    fn test_get_all_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let payer = ParticipantId::new();
        repo.upsert(txn(payer, 3)).unwrap();
        repo.upsert(txn(payer, 9)).unwrap();
        repo.upsert(txn(payer, 5)).unwrap();

        let days: Vec<_> = repo
            .get_all()
            .unwrap()
            .iter()
            .map(|t| t.date.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["09", "05", "03"]);
    }

    #[test]
    fn test_get_by_payer() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = ParticipantId::new();
        let bob = ParticipantId::new();
        repo.upsert(txn(alice, 1)).unwrap();
        repo.upsert(txn(bob, 2)).unwrap();

        assert_eq!(repo.get_by_payer(alice).unwrap().len(), 1);
    }
}
