//! Participant repository for JSON storage
//!
//! Manages loading and saving the sheet's participants to participants.json.
//! Insertion order is preserved on disk and in memory; it is the order the
//! allocation engine iterates in.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{Participant, ParticipantId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ParticipantData {
    participants: Vec<Participant>,
}

/// Repository for participant persistence
pub struct ParticipantRepository {
    path: PathBuf,
    data: RwLock<Vec<Participant>>,
}

impl ParticipantRepository {
    /// Create a new participant repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load participants from disk
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: ParticipantData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data.participants;

        Ok(())
    }

    /// Save participants to disk
    pub fn save(&self) -> Result<(), SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = ParticipantData {
            participants: data.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// All participants in registry order
    pub fn get_all(&self) -> Result<Vec<Participant>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Get a participant by ID
    pub fn get(&self, id: ParticipantId) -> Result<Option<Participant>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().find(|p| p.id == id).cloned())
    }

    /// Get a participant by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Participant>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().find(|p| p.matches_name(name)).cloned())
    }

    /// Append a participant, or replace the one with the same ID in place
    pub fn upsert(&self, participant: Participant) -> Result<(), SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant,
            None => data.push(participant),
        }
        Ok(())
    }

    /// Delete a participant, keeping the order of the rest
    pub fn delete(&self, id: ParticipantId) -> Result<bool, SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let before = data.len();
        data.retain(|p| p.id != id);
        Ok(data.len() != before)
    }

    /// Count participants
    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
