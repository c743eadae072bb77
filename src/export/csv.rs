//! CSV export of a split
//!
//! One row per participant, spreadsheet-compatible.

use std::io::Write;

use crate::allocation::SplitSession;
use crate::error::{SplitError, SplitResult};
use crate::export::json::SplitExport;
use crate::models::Participant;

#[derive(serde::Serialize)]
struct CsvRow<'a> {
    participant: &'a str,
    participant_id: String,
    mode: String,
    ratio: f64,
    amount: &'a str,
    currency: &'a str,
}

/// Write a split's shares as CSV
pub fn export_split_csv<W: Write>(
    session: &SplitSession,
    participants: &[Participant],
    writer: W,
) -> SplitResult<()> {
    let export = SplitExport::from_session(session, participants);
    let mut csv_writer = csv::Writer::from_writer(writer);

    for share in &export.shares {
        csv_writer
            .serialize(CsvRow {
                participant: &share.participant,
                participant_id: share.participant_id.to_string(),
                mode: export.mode.to_string(),
                ratio: share.ratio,
                amount: &share.amount,
                currency: &export.currency_code,
            })
            .map_err(|e| SplitError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| SplitError::Export(e.to_string()))?;
    Ok(())
}
