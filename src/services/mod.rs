//! Service layer for splitsheet
//!
//! Services sit on top of the storage layer and the allocation engine,
//! handling validation and the hand-off to external backends.

pub mod participant;
pub mod rates;
pub mod submission;

pub use participant::{ParticipantRegistry, ParticipantService};
pub use rates::{RatePreview, RateProvider, RateService};
pub use submission::{
    LocalLedger, SubmissionFailure, SubmissionReceipt, SubmissionRequest, SubmissionService,
    TransactionSubmitter,
};
