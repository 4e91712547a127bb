//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service layer. Every handler
//! gets a `Session` holding the resolved paths, settings and the user and
//! fiscal year the invocation runs as.

pub mod backup;
pub mod catalog;
pub mod categorize;
pub mod log;

pub use backup::{handle_backup_command, BackupCommands};
pub use catalog::{handle_catalog_command, CatalogCommands};
pub use categorize::{handle_categorize_command, CategorizeArgs};
pub use log::{handle_log_command, LogCommands};

use crate::audit::{SessionAction, SessionEntry, SessionLog};
use crate::config::{FoodprintPaths, Settings};
use crate::error::FoodprintResult;
use crate::models::FiscalYear;
use crate::storage::CatalogStore;

/// Everything one invocation works with
pub struct Session {
    pub paths: FoodprintPaths,
    pub settings: Settings,
    pub user: String,
    pub fiscal_year: FiscalYear,
}

impl Session {
    /// Resolve the user and fiscal year, letting per-invocation overrides win
    pub fn new(
        paths: FoodprintPaths,
        settings: Settings,
        user: Option<String>,
        fiscal_year: Option<String>,
    ) -> Self {
        let user = user
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| settings.user_name.clone());
        let fiscal_year = fiscal_year
            .map(FiscalYear::new)
            .filter(|fy| !fy.is_empty())
            .unwrap_or_else(|| settings.effective_fiscal_year());

        Self {
            paths,
            settings,
            user,
            fiscal_year,
        }
    }

    pub fn store(&self) -> CatalogStore {
        CatalogStore::new(&self.paths)
    }

    pub fn session_log(&self) -> SessionLog {
        SessionLog::new(self.paths.session_log())
    }

    /// Record a user action in the session log
    pub fn record(&self, action: SessionAction, message: impl Into<String>) -> FoodprintResult<()> {
        self.session_log()
            .log(&SessionEntry::new(&self.user, action, message))
    }
}
