//! Participant display formatting

use crate::models::{Participant, ParticipantId};

/// Format the participant registry in allocation order
pub fn format_participant_list(participants: &[Participant]) -> String {
    if participants.is_empty() {
        return "No participants found.\n\nRun 'splitsheet participant add <name>' to add one."
            .to_string();
    }

    let name_width = participants
        .iter()
        .map(|p| p.display_name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<name_width$}  {:<12}  {}\n",
        "#",
        "Name",
        "ID",
        "Joined",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:->3}  {:-<name_width$}  {:-<12}  {:-<10}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (i, participant) in participants.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}  {:<name_width$}  {:<12}  {}\n",
            i + 1,
            participant.display_name,
            participant.id.to_string(),
            participant.created_at.format("%Y-%m-%d"),
            name_width = name_width,
        ));
    }

    output
}

/// Display name for `id`, falling back to the ID itself
pub fn participant_name(participants: &[Participant], id: ParticipantId) -> String {
    participants
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.display_name.clone())
        .unwrap_or_else(|| id.to_string())
}
