//! User settings for foodprint
//!
//! Persisted as `config.json` in the data directory. Every field has a serde
//! default so older or hand-edited files keep loading.

use serde::{Deserialize, Serialize};

use super::columns::{CatalogColumns, OutputColumns, PurchaseColumns};
use super::paths::FoodprintPaths;
use crate::error::FoodprintError;
use crate::models::FiscalYear;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of backups to keep
    pub keep: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { keep: 30 }
    }
}

/// User settings for foodprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name recorded in the session log and on catalog revisions
    #[serde(default = "default_user_name")]
    pub user_name: String,

    /// Track per-fiscal-year purchase presence on catalog entries
    #[serde(default)]
    pub historical_tracking: bool,

    /// Cell text that marks an item as purchased in a fiscal year
    #[serde(default = "default_presence_marker")]
    pub presence_marker: String,

    /// Fiscal year override; computed from today's date when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<FiscalYear>,

    /// Receive unit that denotes a currency amount rather than food
    #[serde(default = "default_currency_unit")]
    pub currency_unit: String,

    /// First-category label for non-food purchases
    #[serde(default = "default_non_food_label")]
    pub non_food_label: String,

    #[serde(default)]
    pub purchase_columns: PurchaseColumns,

    #[serde(default)]
    pub catalog_columns: CatalogColumns,

    #[serde(default)]
    pub output_columns: OutputColumns,

    #[serde(default)]
    pub backup_retention: BackupRetention,
}

fn default_schema_version() -> u32 {
    1
}

fn default_user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn default_presence_marker() -> String {
    "t".to_string()
}

fn default_currency_unit() -> String {
    "dollars".to_string()
}

fn default_non_food_label() -> String {
    "non-food related".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_name: default_user_name(),
            historical_tracking: false,
            presence_marker: default_presence_marker(),
            fiscal_year: None,
            currency_unit: default_currency_unit(),
            non_food_label: default_non_food_label(),
            purchase_columns: PurchaseColumns::default(),
            catalog_columns: CatalogColumns::default(),
            output_columns: OutputColumns::default(),
            backup_retention: BackupRetention::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &FoodprintPaths) -> Result<Self, FoodprintError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FoodprintError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| FoodprintError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FoodprintPaths) -> Result<(), FoodprintError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FoodprintError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FoodprintError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject layouts and markers the passes cannot work with
    pub fn validate(&self) -> Result<(), FoodprintError> {
        self.purchase_columns.validate()?;
        self.catalog_columns.validate()?;
        self.output_columns.validate()?;

        if self.presence_marker.trim().is_empty() {
            return Err(FoodprintError::Config(
                "presence_marker must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The fiscal year new presence marks are recorded under
    pub fn effective_fiscal_year(&self) -> FiscalYear {
        self.fiscal_year
            .clone()
            .unwrap_or_else(|| FiscalYear::for_date(chrono::Local::now().date_naive()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.historical_tracking);
        assert_eq!(settings.presence_marker, "t");
        assert_eq!(settings.currency_unit, "dollars");
        assert_eq!(settings.non_food_label, "non-food related");
        assert_eq!(settings.backup_retention.keep, 30);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FoodprintPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.historical_tracking = true;
        settings.user_name = "fitz".into();
        settings.fiscal_year = Some(FiscalYear::new("fy21"));
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(loaded.historical_tracking);
        assert_eq!(loaded.user_name, "fitz");
        assert_eq!(loaded.effective_fiscal_year().as_str(), "FY21");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FoodprintPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"historical_tracking": true}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(loaded.historical_tracking);
        assert_eq!(loaded.catalog_columns, CatalogColumns::default());
    }

    #[test]
    fn test_invalid_layout_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FoodprintPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.purchase_columns.vendor = settings.purchase_columns.item_name;
        settings.save(&paths).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, FoodprintError::Config(_)));
    }
}
