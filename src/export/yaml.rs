//! YAML export of a split

use std::io::Write;

use crate::allocation::SplitSession;
use crate::error::{SplitError, SplitResult};
use crate::export::json::SplitExport;
use crate::models::Participant;

/// Write a split as YAML with a short header comment
pub fn export_split_yaml<W: Write>(
    session: &SplitSession,
    participants: &[Participant],
    writer: &mut W,
) -> SplitResult<()> {
    let export = SplitExport::from_session(session, participants);

    writeln!(writer, "# splitsheet split export")
        .map_err(|e| SplitError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| SplitError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| SplitError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}
