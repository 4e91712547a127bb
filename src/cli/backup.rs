//! Backup CLI commands

use clap::Subcommand;

use super::Session;
use crate::audit::SessionAction;
use crate::backup::BackupManager;
use crate::display::format_backup_list;
use crate::error::FoodprintResult;

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Back up the current catalog revision
    Create,

    /// List backups, newest first
    List,

    /// Delete backups beyond the retention limit
    Prune {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(session: &Session, cmd: BackupCommands) -> FoodprintResult<()> {
    let retention = session.settings.backup_retention.clone();
    let keep = retention.keep;
    let manager = BackupManager::new(&session.paths, retention);

    match cmd {
        BackupCommands::Create => {
            let info = manager.create_backup(&session.user)?;
            session.record(SessionAction::BackupCreated, info.filename.clone())?;
            println!("Backup created: {}", info.filename);
            println!("Location: {}", info.path.display());
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;
            print!("{}", format_backup_list(&backups));
            if !backups.is_empty() {
                println!("\nTotal: {} backup(s)", backups.len());
            }
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let excess = backups.len().saturating_sub(keep as usize);
            if excess == 0 {
                println!("Nothing to prune ({} backups, keeping {}).", backups.len(), keep);
                return Ok(());
            }

            if !force {
                println!("This will delete the {} oldest backups, keeping {}.", excess, keep);
                println!("To proceed, run again with --force:");
                println!("  foodprint backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            session.record(
                SessionAction::BackupPruned,
                format!("deleted {} backups", deleted.len()),
            )?;
            println!("Deleted {} old backup(s).", deleted.len());
        }
    }

    Ok(())
}
