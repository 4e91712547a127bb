//! The canonical catalog
//!
//! Entries are keyed by identity key in a `BTreeMap`, which gives the
//! deterministic order used when a revision is written out. At most one entry
//! exists per key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog_entry::CatalogEntry;
use super::fiscal_year::FiscalYear;

/// All canonical entries plus the fiscal-year columns seen so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Fiscal-year columns in the order they were first seen
    #[serde(default)]
    fiscal_years: Vec<FiscalYear>,

    #[serde(with = "entry_list")]
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from stored entries; a later duplicate key wins
    pub fn from_entries(
        fiscal_years: Vec<FiscalYear>,
        entries: impl IntoIterator<Item = CatalogEntry>,
    ) -> Self {
        let mut catalog = Self {
            fiscal_years: Vec::new(),
            entries: BTreeMap::new(),
        };
        for fy in fiscal_years {
            catalog.add_fiscal_year(fy);
        }
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace the entry for its identity key, returning the
    /// replaced entry
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.identity_key(), entry)
    }

    /// Entries in identity-key order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn fiscal_years(&self) -> &[FiscalYear] {
        &self.fiscal_years
    }

    /// Register a fiscal-year column; returns false if it was already known
    pub fn add_fiscal_year(&mut self, fiscal_year: FiscalYear) -> bool {
        if fiscal_year.is_empty() || self.fiscal_years.contains(&fiscal_year) {
            return false;
        }
        self.fiscal_years.push(fiscal_year);
        true
    }

    /// Mark the entry with `key` as purchased in `fiscal_year`
    ///
    /// Returns false when no entry has that key.
    pub fn mark_presence(&mut self, key: &str, fiscal_year: &FiscalYear) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.set_presence(fiscal_year.clone(), true);
                self.add_fiscal_year(fiscal_year.clone());
                true
            }
            None => false,
        }
    }

    /// Point every entry's source row at its position in write order
    pub fn renumber_rows(&mut self) {
        for (row, entry) in self.entries.values_mut().enumerate() {
            entry.source_row = Some(row);
        }
    }
}

/// Stores the map as a plain list; keys are recomputed on load
mod entry_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::models::CatalogEntry;

    pub fn serialize<S: Serializer>(
        entries: &BTreeMap<String, CatalogEntry>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&CatalogEntry> = entries.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, CatalogEntry>, D::Error> {
        let list = Vec::<CatalogEntry>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|e| (e.identity_key(), e)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_same_identity() {
        let mut catalog = Catalog::new();
        assert!(catalog
            .insert(CatalogEntry::new("milk", "gal", "Hood"))
            .is_none());
        let replaced = catalog.insert(CatalogEntry::new("MILK", "gal", "hood"));
        assert!(replaced.is_some());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let catalog = Catalog::from_entries(
            vec![],
            vec![
                CatalogEntry::new("zucchini", "case", "a"),
                CatalogEntry::new("apples", "case", "a"),
                CatalogEntry::new("milk", "gal", "a"),
            ],
        );
        let names: Vec<_> = catalog.iter().map(|e| e.item_name.as_str()).collect();
        assert_eq!(names, vec!["apples", "milk", "zucchini"]);
    }

    #[test]
    fn test_mark_presence() {
        let mut catalog = Catalog::from_entries(vec![], vec![CatalogEntry::new("milk", "gal", "hood")]);
        let fy = FiscalYear::new("FY21");

        assert!(catalog.mark_presence("milk (hood) gal", &fy));
        assert!(!catalog.mark_presence("bread (hood) loaf", &fy));
        assert_eq!(catalog.fiscal_years(), &[fy.clone()]);
        assert_eq!(
            catalog.get("milk (hood) gal").unwrap().presence(&fy),
            Some(true)
        );
    }

    #[test]
    fn test_fiscal_years_deduplicated() {
        let mut catalog = Catalog::new();
        assert!(catalog.add_fiscal_year(FiscalYear::new("fy19")));
        assert!(!catalog.add_fiscal_year(FiscalYear::new("FY19")));
        assert!(!catalog.add_fiscal_year(FiscalYear::new("  ")));
        assert_eq!(catalog.fiscal_years().len(), 1);
    }

    #[test]
    fn test_renumber_rows_follows_key_order() {
        let mut catalog = Catalog::from_entries(
            vec![],
            vec![
                CatalogEntry::new("b", "u", "v"),
                CatalogEntry::new("a", "u", "v"),
            ],
        );
        catalog.renumber_rows();
        assert_eq!(catalog.get("a (v) u").unwrap().source_row, Some(0));
        assert_eq!(catalog.get("b (v) u").unwrap().source_row, Some(1));
    }

    #[test]
    fn test_serde_round_trip_rebuilds_keys() {
        let catalog = Catalog::from_entries(
            vec![FiscalYear::new("FY20")],
            vec![CatalogEntry::new("Milk", "gal", "Hood")],
        );
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
        assert!(back.contains("milk (hood) gal"));
    }
}
