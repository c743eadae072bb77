//! Participant model
//!
//! A person on the sheet who can pay for, or owe a share of, a transaction.
//! The order of participants in the registry is the iteration order used by
//! the allocation engine, so it must be stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ParticipantId;

/// A member of the shared expense sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier
    pub id: ParticipantId,

    /// Name shown in tables and used for lookups
    pub display_name: String,

    /// When the participant joined the sheet
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new participant
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            display_name: display_name.into(),
            created_at: Utc::now(),
        }
    }

    /// Normalize a name for case-insensitive matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Whether this participant answers to `name`
    pub fn matches_name(&self, name: &str) -> bool {
        Self::normalize_name(&self.display_name) == Self::normalize_name(name)
    }

    /// Validate the participant
    pub fn validate(&self) -> Result<(), ParticipantValidationError> {
        let trimmed = self.display_name.trim();
        if trimmed.is_empty() {
            return Err(ParticipantValidationError::EmptyName);
        }

        if trimmed.len() > 64 {
            return Err(ParticipantValidationError::NameTooLong(trimmed.len()));
        }

        // '=' separates name and value in `--set name=value`
        if trimmed.contains('=') {
            return Err(ParticipantValidationError::ReservedCharacter('='));
        }

        Ok(())
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// Validation errors for participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    EmptyName,
    NameTooLong(usize),
    ReservedCharacter(char),
}

impl fmt::Display for ParticipantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Participant name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Participant name too long ({} chars, max 64)", len)
            }
            Self::ReservedCharacter(c) => {
                write!(f, "Participant name cannot contain '{}'", c)
            }
        }
    }
}

impl std::error::Error for ParticipantValidationError {}
