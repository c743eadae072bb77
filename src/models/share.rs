//! Share model
//!
//! The amount of a transaction's total attributed to a single participant.

use serde::{Deserialize, Serialize};

use super::ids::ParticipantId;
use super::money::Money;

/// One participant's portion of a transaction total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Who owes this portion
    pub participant_id: ParticipantId,

    /// The portion, in the transaction's currency and scale
    pub amount: Money,
}

impl Share {
    /// Create a new share
    pub fn new(participant_id: ParticipantId, amount: Money) -> Self {
        Self {
            participant_id,
            amount,
        }
    }
}

/// Sum of share amounts in minor units
///
/// Callers are expected to pass shares produced for a single total, so all
/// amounts share one denomination.
pub fn shares_total(shares: &[Share]) -> i64 {
    shares.iter().map(|s| s.amount.amount()).sum()
}
