//! Participant CLI commands
//!
//! Implements CLI commands for managing the sheet's participants.

use clap::Subcommand;

use crate::display::format_participant_list;
use crate::error::SplitResult;
use crate::services::ParticipantService;
use crate::storage::Storage;

/// Participant subcommands
#[derive(Subcommand)]
pub enum ParticipantCommands {
    /// Add a participant
    Add {
        /// Display name
        name: String,
    },
    /// List participants in split order
    List,
    /// Remove a participant
    Remove {
        /// Participant name or ID
        participant: String,
    },
    /// Rename a participant
    Rename {
        /// Participant name or ID
        participant: String,
        /// New name
        name: String,
    },
}

/// Handle a participant command
pub fn handle_participant_command(storage: &Storage, cmd: ParticipantCommands) -> SplitResult<()> {
    let service = ParticipantService::new(storage);

    match cmd {
        ParticipantCommands::Add { name } => {
            let participant = service.add(&name)?;
            println!("Added participant: {}", participant.display_name);
            println!("  ID: {}", participant.id);
        }

        ParticipantCommands::List => {
            let participants = service.list()?;
            print!("{}", format_participant_list(&participants));
            if !participants.is_empty() {
                println!("\nTotal: {} participants", participants.len());
            }
        }

        ParticipantCommands::Remove { participant } => {
            let removed = service.remove(&participant)?;
            println!("Removed participant: {}", removed.display_name);
        }

        ParticipantCommands::Rename { participant, name } => {
            let renamed = service.rename(&participant, &name)?;
            println!("Renamed participant to: {}", renamed.display_name);
        }
    }

    Ok(())
}
