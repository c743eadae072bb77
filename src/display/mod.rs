//! Display formatting for terminal output
//!
//! Formats splits, participants and transactions as plain-text tables.

pub mod participant;
pub mod shares;
pub mod transaction;

pub use participant::{format_participant_list, participant_name};
pub use shares::{format_ratio, format_share_table, format_validation, share_lines, ShareLine};
pub use transaction::{format_transaction_details, format_transaction_register};
