//! Catalog backups
//!
//! `BackupManager` copies the current catalog revision into `backups/` and
//! keeps only the newest `backup_retention.keep` copies.

mod manager;

pub use manager::{BackupInfo, BackupManager};
