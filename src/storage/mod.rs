//! Storage layer for foodprint
//!
//! JSON files with atomic writes. The catalog is kept as numbered revisions.

pub mod catalog;
pub mod file_io;

pub use catalog::{CatalogStore, RevisionInfo};
pub use file_io::{read_json, write_json_atomic};
