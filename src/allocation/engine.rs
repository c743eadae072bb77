//! Allocation engine
//!
//! Turns an ordered participant list, a total and a ratio map into one share
//! per participant. Shares always come back in participant order and, unless
//! every ratio is zero, always sum exactly to the total.

use crate::models::{Money, ParticipantId, Ratios, Share, SplitSpec};

use super::apportion::largest_remainder_units;

/// Divide `total` among `participants` in proportion to `ratios`
///
/// Missing ratios count as zero. If every ratio is zero, every share is zero
/// (a valid transient state while a form is being edited).
pub fn calc_splits(participants: &[ParticipantId], total: &Money, ratios: &Ratios) -> Vec<Share> {
    let weights: Vec<f64> = participants
        .iter()
        .map(|id| ratios.get(id).copied().unwrap_or(0.0))
        .collect();

    allocate(participants, total, &weights)
}

/// Compute the shares described by `spec`, honoring its mode's ratio
/// semantics (Evenly ignores stored ratios, Selected reads them as flags)
pub fn compute_shares(spec: &SplitSpec, participants: &[ParticipantId]) -> Vec<Share> {
    let weights: Vec<f64> = participants
        .iter()
        .map(|id| spec.mode.effective_ratio(spec.ratio(*id)))
        .collect();

    allocate(participants, &spec.total, &weights)
}

fn allocate(participants: &[ParticipantId], total: &Money, weights: &[f64]) -> Vec<Share> {
    debug_assert!(
        weights.iter().all(|w| w.is_finite() && *w >= 0.0),
        "ratios must be validated before allocation"
    );

    let amounts = if weights.iter().all(|w| *w == 0.0) {
        vec![0; participants.len()]
    } else {
        largest_remainder_units(weights, total.amount())
    };

    participants
        .iter()
        .zip(amounts)
        .map(|(id, amount)| Share::new(*id, total.with_amount(amount)))
        .collect()
}
