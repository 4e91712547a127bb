//! Tabular input and output
//!
//! The grouping and import passes only see `Row`s through `TabularSource`,
//! and only emit through `TabularSink`. The CSV implementations live in
//! `csv`.

pub mod csv;

pub use self::csv::{CsvSheetReader, CsvSink};

use crate::error::{FoodprintResult, RowParseError};
use crate::models::{AggregatedItem, CatalogEntry, FiscalYear};

/// A single cell value
///
/// Numeric cells keep their source text so identity fields such as "0042"
/// read back exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number { value: f64, raw: String },
    Empty,
}

impl Cell {
    /// Classify raw cell text: blank is `Empty`, numeric text is `Number`
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        // f64 parsing also accepts words like "nan" and "inf"
        let numeric_start = trimmed
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        match trimmed.parse::<f64>() {
            Ok(value) if numeric_start && value.is_finite() => Cell::Number {
                value,
                raw: raw.to_string(),
            },
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// One row of a sheet, remembering where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Position of the row within its source
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    /// Build a row from raw text cells
    pub fn from_strings<I, S>(index: usize, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(index, raw.into_iter().map(|s| Cell::parse(s.as_ref())).collect())
    }

    pub fn cell(&self, col: usize) -> &Cell {
        self.cells.get(col).unwrap_or(&Cell::Empty)
    }

    /// Cell as it was written in the source; absent cells read as `None`
    pub fn text(&self, col: usize) -> Option<String> {
        match self.cell(col) {
            Cell::Text(s) | Cell::Number { raw: s, .. } => Some(s.clone()),
            Cell::Empty => None,
        }
    }

    /// Cell as a number; text cells are a parse error
    pub fn number(&self, col: usize) -> Result<f64, RowParseError> {
        match self.cell(col) {
            Cell::Number { value, .. } => Ok(*value),
            Cell::Text(s) => Err(RowParseError::new(
                self.index,
                Some(col),
                format!("expected a number, found '{}'", s.trim()),
            )),
            Cell::Empty => Err(RowParseError::new(
                self.index,
                Some(col),
                "expected a number, found an empty cell",
            )),
        }
    }

    /// Optional number: empty is `None`, text is still an error
    pub fn optional_number(&self, col: usize) -> Result<Option<f64>, RowParseError> {
        match self.cell(col) {
            Cell::Empty => Ok(None),
            _ => self.number(col).map(Some),
        }
    }

    /// Trimmed, lower-cased text used for group comparisons
    pub fn key_text(&self, col: usize) -> String {
        self.text(col)
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}

/// An in-memory sheet: optional header plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

/// Something that exposes an indexable sequence of rows
pub trait TabularSource {
    /// Header labels, empty when the source has no header row
    fn header(&self) -> &[String];

    /// Data rows in source order
    fn rows(&self) -> &[Row];
}

impl TabularSource for Sheet {
    fn header(&self) -> &[String] {
        &self.header
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// Destination for run output, one record at a time
///
/// Nothing is guaranteed to be persisted until `flush` returns.
pub trait TabularSink {
    /// Append one aggregated purchase line, enriched from its catalog entry
    fn append_item(
        &mut self,
        item: &AggregatedItem,
        entry: Option<&CatalogEntry>,
    ) -> FoodprintResult<()>;

    /// Append one catalog entry with a presence column per fiscal year
    fn append_entry(
        &mut self,
        entry: &CatalogEntry,
        fiscal_years: &[FiscalYear],
    ) -> FoodprintResult<()>;

    fn flush(&mut self) -> FoodprintResult<()>;
}

/// Sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub items: Vec<(AggregatedItem, Option<CatalogEntry>)>,
    pub entries: Vec<CatalogEntry>,
    pub flushed: bool,
}

impl TabularSink for MemorySink {
    fn append_item(
        &mut self,
        item: &AggregatedItem,
        entry: Option<&CatalogEntry>,
    ) -> FoodprintResult<()> {
        self.items.push((item.clone(), entry.cloned()));
        Ok(())
    }

    fn append_entry(
        &mut self,
        entry: &CatalogEntry,
        _fiscal_years: &[FiscalYear],
    ) -> FoodprintResult<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> FoodprintResult<()> {
        self.flushed = true;
        Ok(())
    }
}
