//! Core data models for foodprint
//!
//! Purchase lines and their per-vendor rollups, canonical catalog entries,
//! the catalog itself and fiscal-year labels.

pub mod catalog;
pub mod catalog_entry;
pub mod fiscal_year;
pub mod purchase;

pub use catalog::Catalog;
pub use catalog_entry::{identity_key, CatalogEntry, CategoryTags, HistoricalPresence};
pub use fiscal_year::FiscalYear;
pub use purchase::{AggregatedItem, PurchaseRow, VendorTotal};
