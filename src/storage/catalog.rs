//! Versioned catalog storage
//!
//! Every import writes the whole catalog as a new revision file
//! (`catalog/rev-0001.json`, `rev-0002.json`, ...). The highest-numbered
//! revision is the current catalog. Presence marks from categorization runs
//! update the current revision in place.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::file_io::{read_json, write_json_atomic};
use crate::config::FoodprintPaths;
use crate::error::{FoodprintError, FoodprintResult};
use crate::models::Catalog;

const REVISION_PREFIX: &str = "rev-";
const REVISION_SUFFIX: &str = ".json";

/// Metadata stored with each revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionInfo {
    pub number: u32,
    pub label: String,
    /// File or operation the revision came from
    pub source: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub entry_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct RevisionFile {
    info: RevisionInfo,
    catalog: Catalog,
}

/// Reads and writes catalog revisions under one directory
#[derive(Debug, Clone)]
pub struct CatalogStore {
    dir: PathBuf,
}

impl CatalogStore {
    pub fn new(paths: &FoodprintPaths) -> Self {
        Self::with_dir(paths.catalog_dir())
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn revision_path(&self, number: u32) -> PathBuf {
        self.dir.join(revision_file_name(number))
    }

    /// Revision numbers present on disk, ascending
    fn revision_numbers(&self) -> FoodprintResult<Vec<u32>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut numbers = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let name = dir_entry?.file_name();
            if let Some(number) = name.to_str().and_then(parse_revision_file_name) {
                numbers.push(number);
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }

    pub fn latest_number(&self) -> FoodprintResult<Option<u32>> {
        Ok(self.revision_numbers()?.last().copied())
    }

    /// Path of the current revision, if any
    pub fn current_path(&self) -> FoodprintResult<Option<PathBuf>> {
        Ok(self.latest_number()?.map(|n| self.revision_path(n)))
    }

    fn read_revision(&self, number: u32) -> FoodprintResult<RevisionFile> {
        let path = self.revision_path(number);
        if !path.exists() {
            return Err(FoodprintError::revision_not_found(number));
        }
        read_json(&path).map_err(catalog_io)
    }

    /// Load a specific revision
    pub fn load_revision(&self, number: u32) -> FoodprintResult<(RevisionInfo, Catalog)> {
        let file = self.read_revision(number)?;
        Ok((file.info, file.catalog))
    }

    /// Load the current catalog; empty when nothing has been saved yet
    pub fn load_current(&self) -> FoodprintResult<Catalog> {
        match self.latest_number().map_err(catalog_io)? {
            Some(number) => {
                let file = self.read_revision(number)?;
                debug!(revision = number, entries = file.catalog.len(), "loaded catalog");
                Ok(file.catalog)
            }
            None => Ok(Catalog::new()),
        }
    }

    /// Write `catalog` as the next revision
    ///
    /// Entry source rows are renumbered to their position in the new
    /// revision before it is written.
    pub fn save_revision(
        &self,
        catalog: &mut Catalog,
        source: &str,
        author: &str,
    ) -> FoodprintResult<RevisionInfo> {
        let number = self.latest_number().map_err(catalog_io)?.unwrap_or(0) + 1;
        catalog.renumber_rows();

        let info = RevisionInfo {
            number,
            label: revision_label(number),
            source: source.to_string(),
            author: author.to_string(),
            created_at: Utc::now(),
            entry_count: catalog.len(),
        };
        self.write(&info, catalog)?;

        info!(revision = number, entries = info.entry_count, "saved catalog revision");
        Ok(info)
    }

    /// Overwrite the current revision with `catalog`
    ///
    /// Creates the first revision when none exists.
    pub fn save_current(&self, catalog: &mut Catalog, author: &str) -> FoodprintResult<RevisionInfo> {
        let Some(number) = self.latest_number().map_err(catalog_io)? else {
            return self.save_revision(catalog, "presence update", author);
        };

        let mut info = self.read_revision(number)?.info;
        info.entry_count = catalog.len();
        self.write(&info, catalog)?;

        debug!(revision = number, "updated current catalog revision");
        Ok(info)
    }

    fn write(&self, info: &RevisionInfo, catalog: &Catalog) -> FoodprintResult<()> {
        #[derive(Serialize)]
        struct RevisionRef<'a> {
            info: &'a RevisionInfo,
            catalog: &'a Catalog,
        }

        write_json_atomic(self.revision_path(info.number), &RevisionRef { info, catalog })
            .map_err(catalog_io)
    }

    /// Metadata of every revision, oldest first
    pub fn list_revisions(&self) -> FoodprintResult<Vec<RevisionInfo>> {
        self.revision_numbers()?
            .into_iter()
            .map(|n| self.read_revision(n).map(|file| file.info))
            .collect()
    }

    /// Delete a revision
    ///
    /// Removing the newest revision makes the previous one current again.
    pub fn remove_revision(&self, number: u32) -> FoodprintResult<RevisionInfo> {
        let info = self.read_revision(number)?.info;
        fs::remove_file(self.revision_path(number))?;
        info!(revision = number, "removed catalog revision");
        Ok(info)
    }
}

/// Any failure to read or write the catalog is a catalog I/O error
fn catalog_io(err: FoodprintError) -> FoodprintError {
    match err {
        FoodprintError::Storage(msg) | FoodprintError::Io(msg) | FoodprintError::Json(msg) => {
            FoodprintError::CatalogIo(msg)
        }
        other => other,
    }
}

fn revision_label(number: u32) -> String {
    format!("{}{:04}", REVISION_PREFIX, number)
}

fn revision_file_name(number: u32) -> String {
    format!("{}{}", revision_label(number), REVISION_SUFFIX)
}

fn parse_revision_file_name(name: &str) -> Option<u32> {
    name.strip_prefix(REVISION_PREFIX)?
        .strip_suffix(REVISION_SUFFIX)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, FiscalYear};
    use tempfile::TempDir;

    fn store() -> (CatalogStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = CatalogStore::with_dir(temp_dir.path().join("catalog"));
        (store, temp_dir)
    }

    fn catalog() -> Catalog {
        Catalog::from_entries(
            vec![FiscalYear::new("FY20")],
            vec![
                CatalogEntry::new("milk", "gal", "hood"),
                CatalogEntry::new("eggs", "cs", "sysco"),
            ],
        )
    }

    #[test]
    fn test_empty_store_loads_empty_catalog() {
        let (store, _temp) = store();
        assert!(store.load_current().unwrap().is_empty());
        assert!(store.list_revisions().unwrap().is_empty());
        assert_eq!(store.latest_number().unwrap(), None);
    }

    #[test]
    fn test_revisions_are_numbered() {
        let (store, _temp) = store();
        let mut catalog = catalog();

        let first = store.save_revision(&mut catalog, "a.csv", "sam").unwrap();
        let second = store.save_revision(&mut catalog, "b.csv", "sam").unwrap();

        assert_eq!(first.number, 1);
        assert_eq!(second.number, 2);
        assert_eq!(second.label, "rev-0002");
        assert!(store.revision_path(2).ends_with("rev-0002.json"));

        let listed = store.list_revisions().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].source, "b.csv");
        assert_eq!(listed[1].entry_count, 2);
    }

    #[test]
    fn test_save_renumbers_source_rows() {
        let (store, _temp) = store();
        let mut catalog = catalog();
        store.save_revision(&mut catalog, "a.csv", "sam").unwrap();

        let loaded = store.load_current().unwrap();
        assert_eq!(loaded.get("eggs (sysco) cs").unwrap().source_row, Some(0));
        assert_eq!(loaded.get("milk (hood) gal").unwrap().source_row, Some(1));
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_save_current_updates_in_place() {
        let (store, _temp) = store();
        let mut catalog = catalog();
        store.save_revision(&mut catalog, "a.csv", "sam").unwrap();

        catalog.mark_presence("milk (hood) gal", &FiscalYear::new("FY21"));
        let info = store.save_current(&mut catalog, "kim").unwrap();

        assert_eq!(info.number, 1);
        assert_eq!(info.author, "sam");
        assert_eq!(store.list_revisions().unwrap().len(), 1);
        let loaded = store.load_current().unwrap();
        assert_eq!(
            loaded.get("milk (hood) gal").unwrap().presence(&FiscalYear::new("FY21")),
            Some(true)
        );
    }

    #[test]
    fn test_save_current_without_revisions_creates_first() {
        let (store, _temp) = store();
        let info = store.save_current(&mut catalog(), "sam").unwrap();
        assert_eq!(info.number, 1);
    }

    #[test]
    fn test_remove_latest_reverts_to_previous() {
        let (store, _temp) = store();
        let mut catalog = catalog();
        store.save_revision(&mut catalog, "a.csv", "sam").unwrap();
        catalog.insert(CatalogEntry::new("bread", "loaf", "bimbo"));
        store.save_revision(&mut catalog, "b.csv", "sam").unwrap();

        assert_eq!(store.load_current().unwrap().len(), 3);
        store.remove_revision(2).unwrap();
        assert_eq!(store.load_current().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_missing_revision() {
        let (store, _temp) = store();
        assert!(store.remove_revision(7).unwrap_err().is_not_found());
    }

    #[test]
    fn test_corrupt_revision_is_catalog_io_error() {
        let (store, _temp) = store();
        fs::create_dir_all(&store.dir).unwrap();
        fs::write(store.revision_path(1), "garbage").unwrap();

        let err = store.load_current().unwrap_err();
        assert!(matches!(err, FoodprintError::CatalogIo(_)));
    }

    #[test]
    fn test_unrelated_files_ignored() {
        let (store, _temp) = store();
        fs::create_dir_all(&store.dir).unwrap();
        fs::write(store.dir.join("notes.txt"), "hi").unwrap();
        fs::write(store.dir.join("rev-abc.json"), "{}").unwrap();
        assert_eq!(store.latest_number().unwrap(), None);
    }
}
