//! Split mode and split specification
//!
//! A `SplitSpec` is the in-progress description of how one transaction's
//! total is divided: the mode, one ratio per participant, and the total.
//! The meaning of a ratio depends on the mode (see `allocation::strategy`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::ids::ParticipantId;
use super::money::Money;

/// Per-participant ratio values
pub type Ratios = HashMap<ParticipantId, f64>;

/// The five split strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Everybody pays the same
    #[default]
    Evenly,
    /// Everybody who is ticked pays the same
    Selected,
    /// Proportional to relative weights
    Shares,
    /// Percent points that must total 100
    Percentage,
    /// Explicit amounts that must total the transaction amount
    Amounts,
}

impl SplitMode {
    /// All modes, in menu order
    pub const ALL: [SplitMode; 5] = [
        Self::Evenly,
        Self::Selected,
        Self::Shares,
        Self::Percentage,
        Self::Amounts,
    ];

    /// Parse a mode from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "evenly" | "even" | "equal" => Some(Self::Evenly),
            "selected" | "select" => Some(Self::Selected),
            "shares" | "share" | "weights" => Some(Self::Shares),
            "percentage" | "percent" | "pct" | "%" => Some(Self::Percentage),
            "amounts" | "amount" | "exact" => Some(Self::Amounts),
            _ => None,
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evenly => write!(f, "evenly"),
            Self::Selected => write!(f, "selected"),
            Self::Shares => write!(f, "shares"),
            Self::Percentage => write!(f, "percentage"),
            Self::Amounts => write!(f, "amounts"),
        }
    }
}

/// How a transaction total is to be split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSpec {
    pub mode: SplitMode,
    pub ratios: Ratios,
    pub total: Money,
}

impl SplitSpec {
    /// Create a spec with explicit ratios
    pub fn new(mode: SplitMode, ratios: Ratios, total: Money) -> Self {
        Self {
            mode,
            ratios,
            total,
        }
    }

    /// Ratio for a participant; missing entries count as zero
    pub fn ratio(&self, id: ParticipantId) -> f64 {
        self.ratios.get(&id).copied().unwrap_or(0.0)
    }

    /// Ratios in participant order
    pub fn ratio_vector(&self, participants: &[ParticipantId]) -> Vec<f64> {
        participants.iter().map(|id| self.ratio(*id)).collect()
    }

    /// Sum of the ratios of the given participants
    pub fn ratio_sum(&self, participants: &[ParticipantId]) -> f64 {
        participants.iter().map(|id| self.ratio(*id)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(SplitMode::parse("evenly"), Some(SplitMode::Evenly));
        assert_eq!(SplitMode::parse("Percent"), Some(SplitMode::Percentage));
        assert_eq!(SplitMode::parse(" amounts "), Some(SplitMode::Amounts));
        assert_eq!(SplitMode::parse("weights"), Some(SplitMode::Shares));
        assert_eq!(SplitMode::parse("bogus"), None);
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in SplitMode::ALL {
            assert_eq!(SplitMode::parse(&mode.to_string()), Some(mode));
        }
    }

    #[test]
    fn test_missing_ratio_is_zero() {
        let a = ParticipantId::new();
        let b = ParticipantId::new();
        let mut ratios = Ratios::new();
        ratios.insert(a, 2.0);
        let spec = SplitSpec::new(SplitMode::Shares, ratios, Money::new(100, 2, "USD"));

        assert_eq!(spec.ratio(a), 2.0);
        assert_eq!(spec.ratio(b), 0.0);
        assert_eq!(spec.ratio_vector(&[b, a]), vec![0.0, 2.0]);
        assert_eq!(spec.ratio_sum(&[a, b]), 2.0);
    }

    #[test]
    fn test_mode_serialization() {
        let json = serde_json::to_string(&SplitMode::Percentage).unwrap();
        assert_eq!(json, "\"percentage\"");
    }
}
