//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod participant;
pub mod rate;
pub mod split;
pub mod transaction;

pub use participant::{handle_participant_command, ParticipantCommands};
pub use rate::{handle_rate_command, RateCommands};
pub use split::{
    handle_split_command, handle_submit_command, OutputFormat, SplitArgs, SplitCommandArgs,
    SubmitArgs,
};
pub use transaction::{handle_transaction_command, TransactionCommands};
