//! Configuration module for foodprint
//!
//! - data directory resolution
//! - persisted user settings
//! - column layouts for every tabular shape

pub mod columns;
pub mod paths;
pub mod settings;

pub use columns::{CatalogColumns, OutputColumns, PurchaseColumns, CATEGORY_SLOTS};
pub use paths::FoodprintPaths;
pub use settings::{BackupRetention, Settings};
