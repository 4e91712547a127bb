//! Path management for foodprint
//!
//! ## Path Resolution Order
//!
//! 1. `FOODPRINT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/foodprint` or `~/.config/foodprint`
//! 3. Windows: `%APPDATA%\foodprint`

use std::path::PathBuf;

use crate::error::FoodprintError;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "FOODPRINT_DATA_DIR";

/// Manages all paths used by foodprint
#[derive(Debug, Clone)]
pub struct FoodprintPaths {
    base_dir: PathBuf,
}

impl FoodprintPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FoodprintError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base foodprint directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON file per catalog revision
    pub fn catalog_dir(&self) -> PathBuf {
        self.base_dir.join("catalog")
    }

    /// Directory for catalog backups
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Path to the settings file (config.json)
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Append-only session log (JSON lines)
    pub fn session_log(&self) -> PathBuf {
        self.base_dir.join("session.log")
    }

    /// Ensure the base, catalog and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), FoodprintError> {
        for dir in [self.base_dir.clone(), self.catalog_dir(), self.backup_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                FoodprintError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Check if foodprint has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FoodprintError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("foodprint"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| FoodprintError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("foodprint"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FoodprintError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| FoodprintError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("foodprint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FoodprintPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.catalog_dir(), temp_dir.path().join("catalog"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
        assert_eq!(paths.session_log(), temp_dir.path().join("session.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FoodprintPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.catalog_dir().exists());
        assert!(paths.backup_dir().exists());
        assert!(!paths.is_initialized());
    }
}
