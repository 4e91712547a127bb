//! CSV-backed sheets
//!
//! `CsvSheetReader` loads a whole file into a `Sheet`; `CsvSink` writes
//! categorization output and catalog exports using the configured layouts.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Writer, WriterBuilder};

use super::{Row, Sheet, TabularSink};
use crate::config::{CatalogColumns, OutputColumns, Settings};
use crate::error::{FoodprintError, FoodprintResult};
use crate::models::{AggregatedItem, CatalogEntry, FiscalYear};

/// Reads CSV files into sheets
#[derive(Debug, Clone)]
pub struct CsvSheetReader {
    has_header: bool,
    delimiter: u8,
}

impl Default for CsvSheetReader {
    fn default() -> Self {
        Self {
            has_header: false,
            delimiter: b',',
        }
    }
}

impl CsvSheetReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat the first record as a header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn read_path(&self, path: &Path) -> FoodprintResult<Sheet> {
        let file = File::open(path).map_err(|e| {
            FoodprintError::Io(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.read_from(file)
    }

    /// Read every record; row indices count the header row when present
    pub fn read_from<R: Read>(&self, reader: R) -> FoodprintResult<Sheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let mut sheet = Sheet::default();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if index == 0 && self.has_header {
                sheet.header = record.iter().map(|s| s.trim().to_string()).collect();
                continue;
            }
            sheet.rows.push(Row::from_strings(index, record.iter()));
        }
        Ok(sheet)
    }
}

/// Writes output rows as CSV
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
    output: OutputColumns,
    catalog: CatalogColumns,
    presence_marker: String,
}

impl CsvSink<File> {
    /// Create (or truncate) `path`
    pub fn create(path: &Path, settings: &Settings) -> FoodprintResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path).map_err(|e| {
            FoodprintError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        Ok(Self::from_writer(file, settings))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W, settings: &Settings) -> Self {
        Self {
            writer: WriterBuilder::new().flexible(true).from_writer(writer),
            output: settings.output_columns.clone(),
            catalog: settings.catalog_columns.clone(),
            presence_marker: settings.presence_marker.clone(),
        }
    }

    /// Header row for categorization output
    pub fn write_item_header(&mut self) -> FoodprintResult<()> {
        let o = &self.output;
        let mut cells = vec![String::new(); o.width()];
        cells[o.item_name] = "Item Name".into();
        cells[o.receive_unit] = "Received Unit".into();
        cells[o.vendor] = "Vendor".into();
        cells[o.quantity] = "Quantity".into();
        for (i, &col) in o.categories.iter().enumerate() {
            cells[col] = format!("Category {}", i + 1);
        }
        cells[o.weight_per_unit] = "Weight Per Unit".into();
        cells[o.weight_unit] = "Unit Weight".into();
        cells[o.cost] = "Cost".into();
        self.write_cells(cells)
    }

    /// Header row for catalog exports, one column per fiscal year
    pub fn write_catalog_header(&mut self, fiscal_years: &[FiscalYear]) -> FoodprintResult<()> {
        let c = &self.catalog;
        let first_fy = c.first_fiscal_year_column();
        let mut cells = vec![String::new(); first_fy + fiscal_years.len()];
        cells[c.item_name] = "Item Name".into();
        cells[c.receive_unit] = "Received Unit".into();
        cells[c.vendor] = "Vendor".into();
        for (i, &col) in c.categories.iter().enumerate() {
            cells[col] = format!("Category {}", i + 1);
        }
        cells[c.weight_per_unit] = "Weight Per Unit".into();
        cells[c.weight_unit] = "Unit Weight".into();
        for (i, fy) in fiscal_years.iter().enumerate() {
            cells[first_fy + i] = fy.to_string();
        }
        self.write_cells(cells)
    }

    fn write_cells(&mut self, cells: Vec<String>) -> FoodprintResult<()> {
        self.writer
            .write_record(&cells)
            .map_err(|e| FoodprintError::Export(format!("Failed to write row: {}", e)))
    }

    /// Give back the underlying writer after flushing
    pub fn into_inner(self) -> FoodprintResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| FoodprintError::Export(format!("Failed to flush output: {}", e)))
    }
}

impl<W: Write> TabularSink for CsvSink<W> {
    fn append_item(
        &mut self,
        item: &AggregatedItem,
        entry: Option<&CatalogEntry>,
    ) -> FoodprintResult<()> {
        let o = &self.output;
        let mut cells = vec![String::new(); o.width()];
        cells[o.item_name] = item.item_name.clone();
        cells[o.receive_unit] = item.receive_unit.clone();
        cells[o.vendor] = item.vendor.clone();
        cells[o.quantity] = item.quantity.to_string();
        cells[o.cost] = item.cost.to_string();

        if let Some(entry) = entry {
            if let Some(weight) = entry.weight_per_unit {
                cells[o.weight_per_unit] = weight.to_string();
            }
            cells[o.weight_unit] = entry.weight_unit.clone();
            for (slot, &col) in entry.categories.slots().iter().zip(o.categories.iter()) {
                cells[col] = slot.clone();
            }
        }
        self.write_cells(cells)
    }

    fn append_entry(
        &mut self,
        entry: &CatalogEntry,
        fiscal_years: &[FiscalYear],
    ) -> FoodprintResult<()> {
        let c = &self.catalog;
        let first_fy = c.first_fiscal_year_column();
        let mut cells = vec![String::new(); first_fy + fiscal_years.len()];
        cells[c.item_name] = entry.item_name.clone();
        cells[c.receive_unit] = entry.receive_unit.clone();
        cells[c.vendor] = entry.vendor.clone();
        for (slot, &col) in entry.categories.slots().iter().zip(c.categories.iter()) {
            cells[col] = slot.clone();
        }
        if let Some(weight) = entry.weight_per_unit {
            cells[c.weight_per_unit] = weight.to_string();
        }
        cells[c.weight_unit] = entry.weight_unit.clone();
        for (i, fy) in fiscal_years.iter().enumerate() {
            if entry.presence(fy) == Some(true) {
                cells[first_fy + i] = self.presence_marker.clone();
            }
        }
        self.write_cells(cells)
    }

    fn flush(&mut self) -> FoodprintResult<()> {
        self.writer
            .flush()
            .map_err(|e| FoodprintError::Export(format!("Failed to flush output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::{Cell, TabularSource};
    use tempfile::TempDir;

    #[test]
    fn test_read_without_header() {
        let data = "milk,gal,hood,2,3.5\nbread,loaf,,1,abc\n";
        let sheet = CsvSheetReader::new().read_from(data.as_bytes()).unwrap();

        assert!(sheet.header().is_empty());
        assert_eq!(sheet.rows().len(), 2);
        assert_eq!(sheet.rows()[0].index, 0);
        assert_eq!(
            sheet.rows()[0].cell(3),
            &Cell::Number {
                value: 2.0,
                raw: "2".into()
            }
        );
        assert_eq!(sheet.rows()[1].cell(2), &Cell::Empty);
        assert_eq!(sheet.rows()[1].cell(4), &Cell::Text("abc".into()));
    }

    #[test]
    fn test_read_with_header_keeps_file_positions() {
        let data = "Item Name,Unit,Vendor,FY19\nmilk,gal,hood,t\n";
        let sheet = CsvSheetReader::new()
            .with_header(true)
            .read_from(data.as_bytes())
            .unwrap();

        assert_eq!(sheet.header(), &["Item Name", "Unit", "Vendor", "FY19"]);
        assert_eq!(sheet.rows().len(), 1);
        assert_eq!(sheet.rows()[0].index, 1);
    }

    #[test]
    fn test_ragged_rows_accepted() {
        let data = "a,b\na,b,c,d\n";
        let sheet = CsvSheetReader::new().read_from(data.as_bytes()).unwrap();
        assert_eq!(sheet.rows()[1].cells.len(), 4);
    }

    #[test]
    fn test_item_rows_enriched_from_entry() {
        let settings = Settings::default();
        let mut sink = CsvSink::from_writer(Vec::new(), &settings);

        let item = AggregatedItem::new("chix brst", "cs", "feesers", 9.0, 3.0);
        let entry = CatalogEntry::new("chix brst", "cs", "feesers")
            .with_categories(["meat"])
            .with_weight(Some(40.0), "lbs");

        sink.write_item_header().unwrap();
        sink.append_item(&item, Some(&entry)).unwrap();
        sink.append_item(&item, None).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "chix brst,cs,feesers,3,meat,,,,40,lbs,9");
        assert_eq!(lines[2], "chix brst,cs,feesers,3,,,,,,,9");
    }

    #[test]
    fn test_catalog_rows_mark_presence() {
        let settings = Settings::default();
        let mut sink = CsvSink::from_writer(Vec::new(), &settings);
        let fys = vec![FiscalYear::new("FY19"), FiscalYear::new("FY20")];

        let mut entry = CatalogEntry::new("milk", "gal", "hood").with_categories(["dairy"]);
        entry.set_presence(FiscalYear::new("FY20"), true);
        entry.set_presence(FiscalYear::new("FY19"), false);

        sink.append_entry(&entry, &fys).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(out.trim_end(), "milk,gal,hood,dairy,,,,,,,t");
    }

    #[test]
    fn test_create_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("calc.csv");
        let settings = Settings::default();

        let mut sink = CsvSink::create(&path, &settings).unwrap();
        sink.write_item_header().unwrap();
        sink.flush().unwrap();
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Item Name,Received Unit,Vendor,Quantity"));
    }
}
