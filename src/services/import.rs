//! Catalog import
//!
//! Parses catalog sheet rows into `CatalogEntry` values and reconciles each
//! against the catalog through `CatalogMerger`. A row that cannot be parsed
//! is reported with its index and skipped; the rest of the sheet is still
//! imported.

use tracing::debug;

use crate::config::{CatalogColumns, Settings};
use crate::error::RowParseError;
use crate::models::{Catalog, CatalogEntry, FiscalYear, HistoricalPresence};
use crate::notify::Notifier;
use crate::services::grouper::RowFailure;
use crate::services::merger::{CatalogMerger, MergeStatus};
use crate::tabular::{Cell, Row, TabularSource};

/// Outcome of one import session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub new: usize,
    pub unchanged: usize,
    pub changed: usize,
    pub failures: Vec<RowFailure>,
    /// Fiscal-year columns found in the sheet header
    pub fiscal_years_seen: Vec<FiscalYear>,
}

impl ImportReport {
    /// Rows that made it into the catalog
    pub fn processed(&self) -> usize {
        self.new + self.unchanged + self.changed
    }

    fn record(&mut self, status: MergeStatus) {
        match status {
            MergeStatus::New => self.new += 1,
            MergeStatus::Unchanged => self.unchanged += 1,
            MergeStatus::Changed => self.changed += 1,
        }
    }
}

/// Imports catalog sheets into a catalog
pub struct CatalogImportService<'a> {
    columns: &'a CatalogColumns,
    presence_marker: &'a str,
    historical_tracking: bool,
}

impl<'a> CatalogImportService<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            columns: &settings.catalog_columns,
            presence_marker: &settings.presence_marker,
            historical_tracking: settings.historical_tracking,
        }
    }

    /// Header columns holding fiscal-year presence, with their labels
    pub fn fiscal_year_columns(&self, header: &[String]) -> Vec<(usize, FiscalYear)> {
        header
            .iter()
            .enumerate()
            .skip(self.columns.first_fiscal_year_column())
            .map(|(col, label)| (col, FiscalYear::new(label)))
            .filter(|(_, fy)| !fy.is_empty())
            .collect()
    }

    /// Parse one catalog row
    ///
    /// Presence is read only for the given fiscal-year columns. An empty
    /// presence cell stays unknown; anything else is true only when it is
    /// the presence marker. With historical tracking on, every entry carries
    /// a history map, even when all its presence cells are empty.
    pub fn parse_entry(
        &self,
        row: &Row,
        fiscal_year_columns: &[(usize, FiscalYear)],
    ) -> Result<CatalogEntry, RowParseError> {
        let c = self.columns;

        let item_name = row.key_text(c.item_name);
        if item_name.is_empty() {
            return Err(RowParseError::new(
                row.index,
                Some(c.item_name),
                "missing item name",
            ));
        }
        let receive_unit = trimmed(row, c.receive_unit);
        let vendor = trimmed(row, c.vendor);

        let mut categories = Vec::new();
        for &col in &c.categories {
            match row.cell(col) {
                Cell::Empty => break,
                Cell::Text(label) => categories.push(label.trim().to_string()),
                Cell::Number { .. } => {
                    return Err(RowParseError::new(
                        row.index,
                        Some(col),
                        "expected a category label, found a number",
                    ))
                }
            }
        }

        let weight_per_unit = row.optional_number(c.weight_per_unit)?;
        let weight_unit = trimmed(row, c.weight_unit);

        let mut entry = CatalogEntry::new(item_name, receive_unit, vendor)
            .with_categories(categories)
            .with_weight(weight_per_unit, weight_unit);
        if self.historical_tracking {
            entry = entry.with_historical(HistoricalPresence::new());
        }

        for (col, fiscal_year) in fiscal_year_columns {
            if let Some(value) = row.text(*col) {
                let present = value.trim().eq_ignore_ascii_case(self.presence_marker);
                entry.set_presence(fiscal_year.clone(), present);
            }
        }

        Ok(entry)
    }

    /// Parse and merge every row of `source` into `catalog`
    pub fn import(
        &self,
        catalog: &mut Catalog,
        source: &impl TabularSource,
        notifier: &dyn Notifier,
    ) -> ImportReport {
        let mut report = ImportReport::default();

        let fiscal_year_columns = if self.historical_tracking {
            self.fiscal_year_columns(source.header())
        } else {
            Vec::new()
        };
        for (_, fy) in &fiscal_year_columns {
            catalog.add_fiscal_year(fy.clone());
        }
        report.fiscal_years_seen = fiscal_year_columns
            .iter()
            .map(|(_, fy)| fy.clone())
            .collect();

        let rows = source.rows();
        notifier.progress(&format!("Importing {} catalog rows", rows.len()));

        let mut merger = CatalogMerger::new(catalog);
        for row in rows.iter().filter(|r| !r.is_blank()) {
            match self.parse_entry(row, &fiscal_year_columns) {
                Ok(entry) => {
                    let status = merger.merge(entry);
                    debug!(row = row.index, %status, "merged catalog row");
                    report.record(status);
                }
                Err(err) => {
                    notifier.row_failed(err.row, &err.to_string());
                    report.failures.push(err.into());
                }
            }
        }

        notifier.progress(&format!(
            "Imported {} rows: {} new, {} unchanged, {} changed, {} failed",
            report.processed(),
            report.new,
            report.unchanged,
            report.changed,
            report.failures.len()
        ));
        report
    }
}

fn trimmed(row: &Row, col: usize) -> String {
    row.text(col).map(|s| s.trim().to_string()).unwrap_or_default()
}
