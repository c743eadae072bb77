//! Share display formatting
//!
//! Formats the result of a split as a table: one row per participant with
//! the mode's input value and the resulting amount, a totals row and the
//! validation verdict underneath.

use crate::allocation::{allocated_total, InputKind, Quantity, SplitSession};
use crate::models::{Money, Participant, ParticipantId, SplitMode};

use super::participant::participant_name;

/// One participant's line in a split
#[derive(Debug, Clone, PartialEq)]
pub struct ShareLine {
    pub participant_id: ParticipantId,
    pub participant: String,
    pub ratio: f64,
    pub amount: Money,
    /// Whether the value was typed rather than computed
    pub edited: bool,
}

/// Build display lines for a session
///
/// Participants missing from `participants` are shown by ID.
pub fn share_lines(session: &SplitSession, participants: &[Participant]) -> Vec<ShareLine> {
    session
        .shares()
        .into_iter()
        .map(|share| ShareLine {
            participant: participant_name(participants, share.participant_id),
            participant_id: share.participant_id,
            ratio: session.ratio(share.participant_id),
            edited: session.dirty_state().is_dirty(share.participant_id),
            amount: share.amount,
        })
        .collect()
}

/// Format a ratio the way the mode's input field shows it
pub fn format_ratio(mode: SplitMode, ratio: f64, total: &Money) -> String {
    match mode.input_kind() {
        InputKind::None => "-".to_string(),
        InputKind::Toggle => {
            if ratio > 0.0 {
                "yes".to_string()
            } else {
                "no".to_string()
            }
        }
        InputKind::Numeric => format!("{}", ratio),
        InputKind::Decimal => format!("{:.2}%", ratio),
        InputKind::Money => total.with_amount(ratio.round() as i64).format_plain(),
    }
}

/// Format a session as a share table
pub fn format_share_table(session: &SplitSession, participants: &[Participant]) -> String {
    let lines = share_lines(session, participants);
    let total = &session.spec().total;
    let mode = session.mode();

    if lines.is_empty() {
        return "No participants to split between.\n".to_string();
    }

    let name_width = lines
        .iter()
        .map(|l| l.participant.chars().count())
        .max()
        .unwrap_or(11)
        .max(11);

    let ratio_header = match mode.input_kind() {
        InputKind::None => "",
        InputKind::Toggle => "Included",
        InputKind::Numeric => "Shares",
        InputKind::Decimal => "Percent",
        InputKind::Money => "Entered",
    };

    let mut output = String::new();
    output.push_str(&format!("Split: {} {}\n\n", total, mode));
    output.push_str(&format!(
        "{:<name_width$}  {:>10}  {:>14}\n",
        "Participant",
        ratio_header,
        format!("Amount ({})", total.currency_code()),
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->10}  {:->14}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for line in &lines {
        let marker = if line.edited { "*" } else { "" };
        output.push_str(&format!(
            "{:<name_width$}  {:>10}  {:>14}\n",
            line.participant,
            format!("{}{}", marker, format_ratio(mode, line.ratio, total)),
            line.amount.format_plain(),
            name_width = name_width,
        ));
    }

    let allocated: i64 = lines.iter().map(|l| l.amount.amount()).sum();
    let allocated_ratio = match allocated_total(session.spec(), session.participants()) {
        Some(Quantity::Percent(p)) => format!("{:.2}%", p),
        Some(Quantity::Amount(m)) => m.format_plain(),
        None => String::new(),
    };

    output.push_str(&format!(
        "{:-<name_width$}  {:->10}  {:->14}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:>10}  {:>14}\n",
        "TOTAL",
        allocated_ratio,
        total.with_amount(allocated).format_plain(),
        name_width = name_width,
    ));

    output.push('\n');
    output.push_str(&format_validation(session));
    output
}

/// One-line validation verdict for a session
pub fn format_validation(session: &SplitSession) -> String {
    match session.validate() {
        Ok(()) => "Split is valid.\n".to_string(),
        Err(failure) => format!("Invalid split: {}\n", failure),
    }
}
