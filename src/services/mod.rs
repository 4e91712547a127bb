//! Service layer for foodprint
//!
//! The grouping pass, catalog merging, catalog import and read-side queries.
//! Services borrow the catalog and settings they work on; persistence is
//! left to the storage layer.

pub mod categorize;
pub mod grouper;
pub mod import;
pub mod merger;
pub mod query;

pub use categorize::{CategorizationReport, CategorizationService};
pub use grouper::{ItemGroup, ItemGrouper, RowFailure};
pub use import::{CatalogImportService, ImportReport};
pub use merger::{CatalogMerger, MergeStatus};
pub use query::{CatalogQuery, FrequencyBuckets};
