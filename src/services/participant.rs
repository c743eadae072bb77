//! Participant service
//!
//! Manages the sheet's participant registry: adding and removing people and
//! resolving the names typed on the command line.

use tracing::info;

use crate::error::{SplitError, SplitResult};
use crate::models::{Participant, ParticipantId};
use crate::storage::Storage;

/// Source of the ordered participant list for a sheet
pub trait ParticipantRegistry {
    /// All participants, in allocation order
    fn participants(&self) -> SplitResult<Vec<Participant>>;

    /// IDs of all participants, in allocation order
    fn participant_ids(&self) -> SplitResult<Vec<ParticipantId>> {
        Ok(self.participants()?.into_iter().map(|p| p.id).collect())
    }
}

/// Service for participant management
pub struct ParticipantService<'a> {
    storage: &'a Storage,
}

impl<'a> ParticipantService<'a> {
    /// Create a new participant service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a participant to the end of the registry
    pub fn add(&self, name: &str) -> SplitResult<Participant> {
        let name = name.trim();

        let participant = Participant::new(name);
        participant
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        if self.storage.participants.get_by_name(name)?.is_some() {
            return Err(SplitError::Duplicate {
                entity_type: "Participant",
                identifier: name.to_string(),
            });
        }

        self.storage.participants.upsert(participant.clone())?;
        self.storage.participants.save()?;

        info!(participant = %participant.id, name = %participant.display_name, "added participant");
        Ok(participant)
    }

    /// Remove a participant by name or ID
    ///
    /// Past transactions keep their shares; the participant simply stops
    /// appearing in new splits.
    pub fn remove(&self, identifier: &str) -> SplitResult<Participant> {
        let participant = self
            .find(identifier)?
            .ok_or_else(|| SplitError::participant_not_found(identifier))?;

        self.storage.participants.delete(participant.id)?;
        self.storage.participants.save()?;

        info!(participant = %participant.id, "removed participant");
        Ok(participant)
    }

    /// Rename a participant, keeping its position
    pub fn rename(&self, identifier: &str, new_name: &str) -> SplitResult<Participant> {
        let mut participant = self
            .find(identifier)?
            .ok_or_else(|| SplitError::participant_not_found(identifier))?;

        if let Some(existing) = self.storage.participants.get_by_name(new_name)? {
            if existing.id != participant.id {
                return Err(SplitError::Duplicate {
                    entity_type: "Participant",
                    identifier: new_name.trim().to_string(),
                });
            }
        }

        participant.display_name = new_name.trim().to_string();
        participant
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.participants.upsert(participant.clone())?;
        self.storage.participants.save()?;
        Ok(participant)
    }

    /// List participants in registry order
    pub fn list(&self) -> SplitResult<Vec<Participant>> {
        self.storage.participants.get_all()
    }

    /// Get a participant by ID
    pub fn get(&self, id: ParticipantId) -> SplitResult<Option<Participant>> {
        self.storage.participants.get(id)
    }

    /// Find a participant by name or ID
    pub fn find(&self, identifier: &str) -> SplitResult<Option<Participant>> {
        if let Some(participant) = self.storage.participants.get_by_name(identifier)? {
            return Ok(Some(participant));
        }

        if let Ok(id) = identifier.parse::<ParticipantId>() {
            return self.storage.participants.get(id);
        }

        Ok(None)
    }

    /// Find a participant or fail with a not-found error
    pub fn require(&self, identifier: &str) -> SplitResult<Participant> {
        self.find(identifier)?
            .ok_or_else(|| SplitError::participant_not_found(identifier))
    }
}

impl ParticipantRegistry for ParticipantService<'_> {
    fn participants(&self) -> SplitResult<Vec<Participant>> {
        self.list()
    }
}
