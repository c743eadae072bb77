//! Proportional money allocation
//!
//! Divides a transaction total among participants under one of five split
//! modes so that the shares always sum exactly to the total in minor units.
//!
//! # Architecture
//!
//! - `apportion`: largest-remainder rounding of weights to an exact integer total
//! - `engine`: ratios + total -> one `Share` per participant
//! - `strategy`: per-mode ratio meaning, defaults, input rules and constraint
//! - `validation`: whether a split satisfies its constraint, with diagnostics
//! - `redistribution`: the editing session that keeps untouched fields balanced
//!
//! Everything here is synchronous and pure apart from `tracing` events.
//!
//! # Example
//!
//! ```
//! use splitsheet::allocation::SplitSession;
//! use splitsheet::models::{Money, ParticipantId, SplitMode};
//!
//! let people: Vec<ParticipantId> = (0..3).map(|_| ParticipantId::new()).collect();
//! let mut session =
//!     SplitSession::with_mode(people.clone(), Money::new(10000, 2, "USD"), SplitMode::Percentage);
//!
//! session.commit(people[0], 30.0).unwrap();
//! assert_eq!(session.ratio(people[1]), 35.0);
//! assert!(session.validate().is_ok());
//! ```

pub mod apportion;
pub mod engine;
pub mod redistribution;
pub mod strategy;
pub mod validation;

pub use apportion::{allocate_by_count, largest_remainder_round, largest_remainder_units};
pub use engine::{calc_splits, compute_shares};
pub use redistribution::{CommitOutcome, DirtyState, FieldState, SplitSession};
pub use strategy::{
    ratios_after_mode_switch, Constraint, ExpectedSum, InputKind, MAX_FIELD_STEPS,
};
pub use validation::{allocated_total, is_valid, validate, Quantity, ValidationFailure};
