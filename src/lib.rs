//! foodprint - food purchase categorization and canonical food catalog
//!
//! This library turns raw purchase sheets into per-vendor cost and quantity
//! lines, and maintains a versioned catalog of food items with their
//! category metadata and the fiscal years each was purchased in.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, persisted settings and column layouts
//! - `error`: Custom error types
//! - `models`: Purchase rows, aggregated items, catalog entries and the catalog
//! - `tabular`: Row/cell model and CSV input and output
//! - `notify`: Progress and row-failure reporting
//! - `services`: Grouping, catalog merge and import, catalog queries
//! - `storage`: Atomic JSON files and the versioned catalog store
//! - `audit`: User-facing session log
//! - `backup`: Catalog backups with retention
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use foodprint::config::{FoodprintPaths, Settings};
//! use foodprint::storage::CatalogStore;
//!
//! let paths = FoodprintPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let catalog = CatalogStore::new(&paths).load_current()?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod storage;
pub mod tabular;

pub use error::{FoodprintError, FoodprintResult};
