//! Transaction submission
//!
//! Turns a finished split session into a transaction and hands it to a
//! submission backend. The split must validate and its shares must add up to
//! the total before the backend is called; backend failures come back as
//! `SplitError::Submission` with the backend's message untouched, and the
//! session is left as it was so the caller can retry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::allocation::SplitSession;
use crate::error::{SplitError, SplitResult};
use crate::models::{shares_total, Money, ParticipantId, Share, SplitMode, Transaction, TransactionId};
use crate::storage::Storage;

/// Everything a backend needs to record a shared expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub payer_id: ParticipantId,
    pub money: Money,
    pub splits: Vec<Share>,
    pub date: NaiveDate,
    pub memo: String,
    pub mode: SplitMode,
}

/// Acknowledgement from a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub transaction_id: TransactionId,
    pub submitted_at: DateTime<Utc>,
}

/// Structured error reported by a backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionFailure {
    /// Backend-specific error code, if it sends one
    pub code: Option<String>,
    pub message: String,
}

impl SubmissionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// A backend that records transactions
pub trait TransactionSubmitter {
    fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, SubmissionFailure>;
}

/// Submitter that records transactions in the local JSON ledger
pub struct LocalLedger<'a> {
    storage: &'a Storage,
}

impl<'a> LocalLedger<'a> {
    /// Create a new local ledger
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Recorded transactions, newest first
    pub fn recent(&self, limit: Option<usize>) -> SplitResult<Vec<Transaction>> {
        let mut transactions = self.storage.transactions.get_all()?;
        if let Some(limit) = limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Get a recorded transaction by ID
    pub fn get(&self, id: TransactionId) -> SplitResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .ok_or_else(|| SplitError::transaction_not_found(id.to_string()))
    }

    /// Find a transaction by full ID or by the short form shown in listings
    pub fn find(&self, identifier: &str) -> SplitResult<Transaction> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.get(id);
        }

        let short = identifier.strip_prefix("txn-").unwrap_or(identifier);
        let mut matches = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| !short.is_empty() && t.id.as_uuid().to_string().starts_with(short));

        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(txn),
            (Some(_), Some(_)) => Err(SplitError::Validation(format!(
                "'{}' matches more than one transaction",
                identifier
            ))),
            _ => Err(SplitError::transaction_not_found(identifier)),
        }
    }
}

impl TransactionSubmitter for LocalLedger<'_> {
    fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, SubmissionFailure> {
        let mut txn = Transaction::new(
            request.payer_id,
            request.date,
            request.money.clone(),
            request.mode,
            request.splits.clone(),
        );
        txn.memo = request.memo.clone();

        txn.validate()
            .map_err(|e| SubmissionFailure::with_code("invalid", e.to_string()))?;

        self.storage
            .transactions
            .upsert(txn.clone())
            .and_then(|_| self.storage.transactions.save())
            .map_err(|e| SubmissionFailure::with_code("storage", e.to_string()))?;

        Ok(SubmissionReceipt {
            transaction_id: txn.id,
            submitted_at: txn.created_at,
        })
    }
}

/// Service that submits finished split sessions
pub struct SubmissionService<'a, S: TransactionSubmitter + ?Sized> {
    submitter: &'a S,
}

impl<'a, S: TransactionSubmitter + ?Sized> SubmissionService<'a, S> {
    /// Create a submission service backed by `submitter`
    pub fn new(submitter: &'a S) -> Self {
        Self { submitter }
    }

    /// Build the request for a session without submitting it
    pub fn prepare(
        &self,
        session: &SplitSession,
        payer_id: ParticipantId,
        date: NaiveDate,
        memo: &str,
    ) -> SplitResult<SubmissionRequest> {
        let splits = session.final_shares()?;
        let total = &session.spec().total;

        let allocated = shares_total(&splits);
        if allocated != total.amount() {
            return Err(SplitError::Validation(format!(
                "Shares add up to {} but the transaction is {}",
                total.with_amount(allocated),
                total
            )));
        }

        Ok(SubmissionRequest {
            payer_id,
            money: total.clone(),
            splits,
            date,
            memo: memo.trim().to_string(),
            mode: session.mode(),
        })
    }

    /// Validate the session and hand it to the backend
    pub fn submit(
        &self,
        session: &SplitSession,
        payer_id: ParticipantId,
        date: NaiveDate,
        memo: &str,
    ) -> SplitResult<SubmissionReceipt> {
        let request = self.prepare(session, payer_id, date, memo)?;

        match self.submitter.submit(&request) {
            Ok(receipt) => {
                info!(
                    transaction = %receipt.transaction_id,
                    amount = %request.money,
                    mode = %request.mode,
                    "submitted transaction"
                );
                Ok(receipt)
            }
            Err(failure) => {
                warn!(code = ?failure.code, "submission failed: {}", failure.message);
                Err(SplitError::Submission(failure.message))
            }
        }
    }
}
