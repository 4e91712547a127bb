//! Session log entries

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a user did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    Init,
    ConfigChanged,
    Categorize,
    CatalogImport,
    CatalogClean,
    RevisionRemoved,
    Export,
    BackupCreated,
    BackupPruned,
    Note,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionAction::Init => "init",
            SessionAction::ConfigChanged => "config",
            SessionAction::Categorize => "categorize",
            SessionAction::CatalogImport => "import",
            SessionAction::CatalogClean => "clean",
            SessionAction::RevisionRemoved => "remove revision",
            SessionAction::Export => "export",
            SessionAction::BackupCreated => "backup",
            SessionAction::BackupPruned => "prune backups",
            SessionAction::Note => "note",
        };
        f.write_str(label)
    }
}

/// One line of the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: SessionAction,
    pub message: String,
}

impl SessionEntry {
    pub fn new(user: impl Into<String>, action: SessionAction, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.into(),
            action,
            message: message.into(),
        }
    }

    /// A free-form note left by the user
    pub fn note(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(user, SessionAction::Note, text)
    }

    pub fn is_note(&self) -> bool {
        self.action == SessionAction::Note
    }
}

impl fmt::Display for SessionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: [{}] {}",
            self.timestamp.format("%m-%d-%Y %H:%M:%S"),
            self.user,
            self.action,
            self.message
        )
    }
}
