//! Interactive split editing with redistribution
//!
//! A `SplitSession` owns the split being edited in one transaction form. Each
//! committed field marks its participant dirty. In Percentage and Amounts
//! modes, every commit recomputes the untouched participants so they absorb
//! whatever the dirty ones leave over: committing "A pays 30%" spreads the
//! remaining 70% over everybody else, and each further commit shrinks that
//! pool.
//!
//! Dirty fields are never overwritten. If the dirty values already reach or
//! exceed the expected sum, the commit is recorded but nothing is
//! redistributed; the split stays over-subscribed and validation reports it.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{SplitError, SplitResult};
use crate::models::{Money, ParticipantId, Ratios, Share, SplitMode, SplitSpec};

use super::apportion::allocate_by_count;
use super::engine::{calc_splits, compute_shares};
use super::strategy::{ratios_after_mode_switch, ExpectedSum};
use super::validation::{validate, ValidationFailure};

/// Edit state of one participant's field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    /// Value was generated (default or redistributed)
    #[default]
    Untouched,
    /// Value was committed by the user in this mode session
    Dirty,
}

/// Which participants the user has edited in the current mode session
#[derive(Debug, Clone, Default)]
pub struct DirtyState {
    fields: HashMap<ParticipantId, FieldState>,
}

impl DirtyState {
    /// Create an empty state where everybody is untouched
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a participant's field
    pub fn state(&self, id: ParticipantId) -> FieldState {
        self.fields.get(&id).copied().unwrap_or_default()
    }

    /// Whether a participant's field was committed
    pub fn is_dirty(&self, id: ParticipantId) -> bool {
        self.state(id) == FieldState::Dirty
    }

    /// Mark a participant's field as committed
    pub fn mark_dirty(&mut self, id: ParticipantId) {
        self.fields.insert(id, FieldState::Dirty);
    }

    /// Forget all edits
    pub fn reset(&mut self) {
        self.fields.clear();
    }

    /// Number of dirty fields
    pub fn dirty_count(&self) -> usize {
        self.fields
            .values()
            .filter(|s| **s == FieldState::Dirty)
            .count()
    }
}

/// What a commit did to the rest of the split
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The mode has no expected sum; only the committed field changed
    Recorded,
    /// Untouched participants were recomputed to share `remaining`
    Redistributed { remaining: f64, recipients: usize },
    /// Every participant is dirty, so there is nobody to redistribute to
    NoUntouchedParticipants,
    /// Dirty values already reach the expected sum; nothing was changed
    OverSubscribed { dirty_sum: f64, expected: f64 },
}

/// An in-progress split for one transaction form
#[derive(Debug, Clone)]
pub struct SplitSession {
    participants: Vec<ParticipantId>,
    spec: SplitSpec,
    dirty: DirtyState,
}

impl SplitSession {
    /// Open a session with an even split over `participants`
    pub fn new(participants: Vec<ParticipantId>, total: Money) -> Self {
        Self::with_mode(participants, total, SplitMode::Evenly)
    }

    /// Open a session in `mode` with that mode's default ratios
    pub fn with_mode(participants: Vec<ParticipantId>, total: Money, mode: SplitMode) -> Self {
        let ratios = mode.default_ratios(&participants);
        Self {
            spec: SplitSpec::new(mode, ratios, total),
            participants,
            dirty: DirtyState::new(),
        }
    }

    /// The split being edited
    pub fn spec(&self) -> &SplitSpec {
        &self.spec
    }

    /// Participants in allocation order
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    /// Current mode
    pub fn mode(&self) -> SplitMode {
        self.spec.mode
    }

    /// Current ratio of a participant
    pub fn ratio(&self, id: ParticipantId) -> f64 {
        self.spec.ratio(id)
    }

    /// Dirty tracking for the current mode session
    pub fn dirty_state(&self) -> &DirtyState {
        &self.dirty
    }

    /// Switch split mode, resetting edits
    ///
    /// Ratios become the new mode's defaults, except that a valid Shares or
    /// Percentage split moving to Amounts keeps its computed amounts.
    pub fn set_mode(&mut self, mode: SplitMode) {
        if mode == self.spec.mode {
            return;
        }
        let ratios = ratios_after_mode_switch(&self.spec, &self.participants, mode);
        debug!(from = %self.spec.mode, to = %mode, "switching split mode");
        self.spec = SplitSpec::new(mode, ratios, self.spec.total.clone());
        self.dirty.reset();
    }

    /// Replace the participant set, resetting edits and ratios
    pub fn set_participants(&mut self, participants: Vec<ParticipantId>) {
        if participants == self.participants {
            return;
        }
        debug!(count = participants.len(), "participant set changed");
        self.spec.ratios = self.spec.mode.default_ratios(&participants);
        self.participants = participants;
        self.dirty.reset();
    }

    /// Change the transaction total; ratios and edits are kept
    pub fn set_total(&mut self, total: Money) {
        self.spec.total = total;
    }

    /// Commit a typed value for one participant
    ///
    /// The value is checked at this boundary: non-finite or negative values,
    /// input to a mode without per-participant fields, and unknown
    /// participants are rejected with `SplitError::MalformedInput` and leave
    /// the session untouched.
    pub fn commit(&mut self, id: ParticipantId, value: f64) -> SplitResult<CommitOutcome> {
        if !self.participants.contains(&id) {
            return Err(SplitError::malformed(
                id.to_string(),
                "participant is not part of this split",
            ));
        }
        let value = self.spec.mode.normalize_input(&id.to_string(), value)?;

        self.spec.ratios.insert(id, value);
        self.dirty.mark_dirty(id);
        debug!(participant = %id, value, mode = %self.spec.mode, "committed split field");

        Ok(self.redistribute())
    }

    /// Flip a Selected-mode toggle; commits immediately
    pub fn toggle(&mut self, id: ParticipantId) -> SplitResult<CommitOutcome> {
        if self.spec.mode != SplitMode::Selected {
            return Err(SplitError::malformed(
                id.to_string(),
                format!("{} splits have no include toggle", self.spec.mode),
            ));
        }
        let next = if self.spec.ratio(id) > 0.0 { 0.0 } else { 1.0 };
        self.commit(id, next)
    }

    fn redistribute(&mut self) -> CommitOutcome {
        let Some(expected) = self.spec.mode.expected_sum() else {
            return CommitOutcome::Recorded;
        };

        let expected_value = expected.value(&self.spec.total);
        let dirty_sum: f64 = self
            .participants
            .iter()
            .filter(|id| self.dirty.is_dirty(**id))
            .map(|id| self.spec.ratio(*id))
            .sum();

        if !dirty_sum.is_finite() || dirty_sum >= expected_value {
            warn!(
                dirty_sum,
                expected = expected_value,
                "committed values reach the expected sum; not redistributing"
            );
            return CommitOutcome::OverSubscribed {
                dirty_sum,
                expected: expected_value,
            };
        }

        let untouched: Vec<ParticipantId> = self
            .participants
            .iter()
            .copied()
            .filter(|id| !self.dirty.is_dirty(*id))
            .collect();
        if untouched.is_empty() {
            return CommitOutcome::NoUntouchedParticipants;
        }

        let remaining = expected_value - dirty_sum;
        let values: Vec<f64> = match expected {
            ExpectedSum::Percent => allocate_by_count(untouched.len(), remaining),
            ExpectedSum::TotalAmount => {
                let pool = self.spec.total.with_amount(remaining.round() as i64);
                let weights: Ratios = untouched.iter().map(|id| (*id, 1.0)).collect();
                calc_splits(&untouched, &pool, &weights)
                    .into_iter()
                    .map(|share| share.amount.amount() as f64)
                    .collect()
            }
        };

        for (id, value) in untouched.iter().zip(values) {
            self.spec.ratios.insert(*id, value);
        }

        debug!(remaining, recipients = untouched.len(), "redistributed split");
        CommitOutcome::Redistributed {
            remaining,
            recipients: untouched.len(),
        }
    }

    /// Check the current split
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        validate(&self.spec, &self.participants)
    }

    /// Shares for the current split, valid or not
    pub fn shares(&self) -> Vec<Share> {
        compute_shares(&self.spec, &self.participants)
    }

    /// Shares for submission; fails while the split is invalid
    pub fn final_shares(&self) -> SplitResult<Vec<Share>> {
        self.validate().map_err(SplitError::Unsatisfiable)?;
        Ok(self.shares())
    }
}
