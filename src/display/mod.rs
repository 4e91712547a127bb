//! Display formatting for terminal output

pub mod catalog;
pub mod report;

pub use catalog::{
    format_catalog_list, format_catalog_stats, format_fiscal_year, format_frequency_buckets,
    format_revision_list, format_uncategorized,
};
pub use report::{
    format_backup_list, format_categorization_report, format_import_report,
    format_session_entries,
};
