//! Backup manager for foodprint
//!
//! Copies the current catalog revision into the backup directory as
//! `backup-<user>-<YYYYMMDD-HHMMSS-mmm>.json` and prunes old copies.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::{BackupRetention, FoodprintPaths};
use crate::error::{FoodprintError, FoodprintResult};
use crate::storage::CatalogStore;

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// User who made the backup
    pub user: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    store: CatalogStore,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: &FoodprintPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            store: CatalogStore::new(paths),
            retention,
        }
    }

    /// Copy the current catalog revision into a new backup
    pub fn create_backup(&self, user: &str) -> FoodprintResult<BackupInfo> {
        let source = self.store.current_path()?.ok_or_else(|| {
            FoodprintError::Validation("Nothing to back up: the catalog has no revisions".into())
        })?;

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| FoodprintError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{}-{:03}.json",
            sanitize_user(user),
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let path = self.backup_dir.join(&filename);

        fs::copy(&source, &path)
            .map_err(|e| FoodprintError::Io(format!("Failed to write backup file: {}", e)))?;
        info!(backup = %filename, "created backup");

        self.parse_backup_info(&path).ok_or_else(|| {
            FoodprintError::Storage(format!("Backup written but unreadable: {}", filename))
        })
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> FoodprintResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| FoodprintError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let path = entry
                .map_err(|e| FoodprintError::Io(format!("Failed to read directory entry: {}", e)))?
                .path();
            if let Some(info) = self.parse_backup_info(&path) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    fn parse_backup_info(&self, path: &Path) -> Option<BackupInfo> {
        let filename = path.file_name()?.to_str()?.to_string();
        let stem = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
        let (user, created_at) = parse_backup_stem(stem)?;
        let size_bytes = fs::metadata(path).ok()?.len();

        Some(BackupInfo {
            filename,
            path: path.to_path_buf(),
            user,
            created_at,
            size_bytes,
        })
    }

    /// Delete all but the newest `retention.keep` backups
    pub fn enforce_retention(&self) -> FoodprintResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();
        for backup in self
            .list_backups()?
            .into_iter()
            .skip(self.retention.keep as usize)
        {
            fs::remove_file(&backup.path)
                .map_err(|e| FoodprintError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }
        Ok(deleted)
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

fn sanitize_user(user: &str) -> String {
    let cleaned: String = user
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

/// Split `<user>-<YYYYMMDD>-<HHMMSS>-<mmm>` from the right
fn parse_backup_stem(stem: &str) -> Option<(String, DateTime<Utc>)> {
    let mut parts = stem.rsplitn(4, '-');
    let millis: u32 = parts.next()?.parse().ok()?;
    let time = parts.next()?;
    let date = parts.next()?;
    let user = parts.next()?;

    let date = NaiveDate::parse_from_str(date, "%Y%m%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H%M%S").ok()?;
    let naive = NaiveDateTime::new(date, time)
        .checked_add_signed(chrono::Duration::milliseconds(i64::from(millis)))?;

    Some((user.to_string(), naive.and_utc()))
}
