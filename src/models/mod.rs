//! Core data models for splitsheet
//!
//! This module contains the data structures of the shared-expense domain:
//! money, participants, split specifications, shares and transactions.

pub mod ids;
pub mod money;
pub mod participant;
pub mod rate;
pub mod share;
pub mod split;
pub mod transaction;

pub use ids::{ParticipantId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use participant::Participant;
pub use rate::ExchangeRate;
pub use share::{shares_total, Share};
pub use split::{Ratios, SplitMode, SplitSpec};
pub use transaction::{Transaction, TransactionValidationError};
