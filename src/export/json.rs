//! JSON export of a split
//!
//! `SplitExport` is the machine-readable form of a split: the total, the
//! mode, every participant's line and the validation verdict. YAML export
//! serializes the same structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::allocation::SplitSession;
use crate::display::share_lines;
use crate::error::{SplitError, SplitResult};
use crate::models::{Participant, ParticipantId, SplitMode};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One participant's share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub participant: String,
    pub participant_id: ParticipantId,
    /// Stored ratio in the mode's unit
    pub ratio: f64,
    /// Share formatted in major units ("33.34")
    pub amount: String,
    /// Share in minor units
    pub minor_units: i64,
}

/// A whole split as exported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub mode: SplitMode,
    pub currency_code: String,
    pub total: String,
    pub total_minor_units: i64,
    pub valid: bool,
    /// Validation message when the split is not valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub shares: Vec<ShareRecord>,
}

impl SplitExport {
    /// Snapshot a session
    pub fn from_session(session: &SplitSession, participants: &[Participant]) -> Self {
        let total = &session.spec().total;
        let verdict = session.validate();

        let shares = share_lines(session, participants)
            .into_iter()
            .map(|line| ShareRecord {
                participant: line.participant,
                participant_id: line.participant_id,
                ratio: line.ratio,
                amount: line.amount.format_plain(),
                minor_units: line.amount.amount(),
            })
            .collect();

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            mode: session.mode(),
            currency_code: total.currency_code().to_string(),
            total: total.format_plain(),
            total_minor_units: total.amount(),
            valid: verdict.is_ok(),
            diagnostic: verdict.err().map(|f| f.to_string()),
            shares,
        }
    }
}

/// Write a split as JSON
pub fn export_split_json<W: Write>(
    session: &SplitSession,
    participants: &[Participant],
    writer: &mut W,
    pretty: bool,
) -> SplitResult<()> {
    let export = SplitExport::from_session(session, participants);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}
