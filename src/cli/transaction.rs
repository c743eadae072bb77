//! Transaction CLI commands
//!
//! Browses the transactions recorded by `submit`.

use clap::Subcommand;

use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::SplitResult;
use crate::services::{LocalLedger, ParticipantService};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List recorded transactions, newest first
    List {
        /// Only transactions paid by this participant
        #[arg(short, long)]
        payer: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show a transaction with its shares
    Show {
        /// Transaction ID, full or as shown in `transaction list`
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(storage: &Storage, cmd: TransactionCommands) -> SplitResult<()> {
    let ledger = LocalLedger::new(storage);
    let participant_service = ParticipantService::new(storage);
    let participants = participant_service.list()?;

    match cmd {
        TransactionCommands::List { payer, limit } => {
            let txns = match payer {
                Some(name) => {
                    let payer = participant_service.require(&name)?;
                    let mut txns = storage.transactions.get_by_payer(payer.id)?;
                    txns.truncate(limit);
                    txns
                }
                None => ledger.recent(Some(limit))?,
            };

            print!("{}", format_transaction_register(&txns, &participants));
            if !txns.is_empty() {
                println!("\nShowing {} transaction(s)", txns.len());
            }
        }

        TransactionCommands::Show { id } => {
            let txn = ledger.find(&id)?;
            print!("{}", format_transaction_details(&txn, &participants));
        }
    }

    Ok(())
}
