//! Transaction model
//!
//! A shared expense as handed to the submission backend: who paid, how much,
//! and the per-participant shares that must add up to the amount.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ParticipantId, TransactionId};
use super::money::Money;
use super::share::Share;
use super::split::SplitMode;

/// A recorded shared-expense transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The participant who paid (or received) the money
    pub payer_id: ParticipantId,

    /// Transaction date
    pub date: NaiveDate,

    /// Total amount
    pub money: Money,

    /// Split mode the shares were computed with
    pub mode: SplitMode,

    /// One share per sheet participant, zero shares included
    pub splits: Vec<Share>,

    /// Memo/notes
    #[serde(default)]
    pub memo: String,

    /// When the transaction was recorded
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        payer_id: ParticipantId,
        date: NaiveDate,
        money: Money,
        mode: SplitMode,
        splits: Vec<Share>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            payer_id,
            date,
            money,
            mode,
            splits,
            memo: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Get the total of all splits in minor units
    pub fn splits_total(&self) -> i64 {
        self.splits.iter().map(|s| s.amount.amount()).sum()
    }

    /// The share attributed to a participant, if any
    pub fn share_of(&self, participant_id: ParticipantId) -> Option<&Share> {
        self.splits
            .iter()
            .find(|s| s.participant_id == participant_id)
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.splits.is_empty() {
            return Err(TransactionValidationError::NoSplits);
        }

        if let Some(share) = self
            .splits
            .iter()
            .find(|s| !s.amount.same_denomination(&self.money))
        {
            return Err(TransactionValidationError::MixedDenomination {
                participant_id: share.participant_id,
            });
        }

        let splits_total = self.splits_total();
        if splits_total != self.money.amount() {
            return Err(TransactionValidationError::SplitsMismatch {
                transaction_amount: self.money.clone(),
                splits_total: self.money.with_amount(splits_total),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.date.format("%Y-%m-%d"), self.money, self.mode)
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NoSplits,
    MixedDenomination {
        participant_id: ParticipantId,
    },
    SplitsMismatch {
        transaction_amount: Money,
        splits_total: Money,
    },
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSplits => write!(f, "Transaction has no splits"),
            Self::MixedDenomination { participant_id } => write!(
                f,
                "Share for {} is not in the transaction currency",
                participant_id
            ),
            Self::SplitsMismatch {
                transaction_amount,
                splits_total,
            } => write!(
                f,
                "Split totals ({}) do not match transaction amount ({})",
                splits_total, transaction_amount
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: i64) -> Money {
        Money::new(amount, 2, "USD")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_balanced_transaction_validates() {
        let a = ParticipantId::new();
        let b = ParticipantId::new();
        let txn = Transaction::new(
            a,
            date(),
            usd(10000),
            SplitMode::Evenly,
            vec![Share::new(a, usd(5000)), Share::new(b, usd(5000))],
        );

        assert_eq!(txn.splits_total(), 10000);
        assert!(txn.validate().is_ok());
        assert_eq!(txn.share_of(b).unwrap().amount, usd(5000));
    }

    #[test]
    fn test_split_validation_mismatch() {
        let a = ParticipantId::new();
        let txn = Transaction::new(
            a,
            date(),
            usd(10000),
            SplitMode::Amounts,
            vec![Share::new(a, usd(9000))],
        );

        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::SplitsMismatch { .. })
        ));
    }

    #[test]
    fn test_mixed_denomination_rejected() {
        let a = ParticipantId::new();
        let txn = Transaction::new(
            a,
            date(),
            usd(100),
            SplitMode::Amounts,
            vec![Share::new(a, Money::new(100, 2, "EUR"))],
        );

        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::MixedDenomination { participant_id: a })
        );
    }

    #[test]
    fn test_display() {
        let a = ParticipantId::new();
        let txn = Transaction::new(
            a,
            date(),
            usd(5000),
            SplitMode::Evenly,
            vec![Share::new(a, usd(5000))],
        );
        assert_eq!(format!("{}", txn), "2025-01-15 50.00 USD (evenly)");
    }
}
