//! Transaction display formatting
//!
//! Register and detail views for recorded transactions.

use crate::models::{Participant, Transaction};

use super::participant::participant_name;

/// Format recorded transactions as a register
pub fn format_transaction_register(txns: &[Transaction], participants: &[Participant]) -> String {
    if txns.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:16} {:>14} {:10} {}\n",
        "Date", "Paid by", "Amount", "Mode", "Memo"
    ));
    output.push_str(&"-".repeat(64));
    output.push('\n');

    for txn in txns {
        output.push_str(&format!(
            "{:10} {:16} {:>14} {:10} {}\n",
            txn.date.format("%Y-%m-%d"),
            truncate(&participant_name(participants, txn.payer_id), 16),
            txn.money.to_string(),
            txn.mode.to_string(),
            truncate(&txn.memo, 30)
        ));
    }

    output
}

/// Format a recorded transaction with its shares
pub fn format_transaction_details(txn: &Transaction, participants: &[Participant]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.money));
    output.push_str(&format!(
        "Paid by:     {}\n",
        participant_name(participants, txn.payer_id)
    ));
    output.push_str(&format!("Mode:        {}\n", txn.mode));
    if !txn.memo.is_empty() {
        output.push_str(&format!("Memo:        {}\n", txn.memo));
    }

    output.push_str("\nShares:\n");
    for share in &txn.splits {
        output.push_str(&format!(
            "  {:<20} {:>12}\n",
            participant_name(participants, share.participant_id),
            share.amount.format_plain()
        ));
    }

    output
}

/// Truncate a string to a maximum length
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
