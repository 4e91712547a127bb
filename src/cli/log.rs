//! Session log CLI commands

use clap::Subcommand;

use super::Session;
use crate::audit::SessionEntry;
use crate::display::format_session_entries;
use crate::error::{FoodprintError, FoodprintResult};

/// Log subcommands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Print the session log
    Show {
        /// Only show notes
        #[arg(long)]
        notes: bool,

        /// Only show the last N entries
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Leave a note in the session log
    Note {
        /// Note text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

/// Handle a log command
pub fn handle_log_command(session: &Session, cmd: LogCommands) -> FoodprintResult<()> {
    let log = session.session_log();

    match cmd {
        LogCommands::Show { notes, recent } => {
            let entries = match (notes, recent) {
                (true, Some(count)) => log.read_recent_notes(count)?,
                (true, None) => log.read_notes()?,
                (false, Some(count)) => log.read_recent(count)?,
                (false, None) => log.read_all()?,
            };
            print!("{}", format_session_entries(&entries));
        }

        LogCommands::Note { text } => {
            let text = text.join(" ");
            if text.trim().is_empty() {
                return Err(FoodprintError::Validation("Note text cannot be empty".into()));
            }
            log.log(&SessionEntry::note(&session.user, text))?;
            println!("Note added.");
        }
    }

    Ok(())
}
