//! Reconciles freshly parsed entries against the canonical catalog

use std::fmt;

use crate::models::{Catalog, CatalogEntry};

/// What a merge did with an incoming entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// No entry had this identity; inserted as-is
    New,
    /// An entry with the same identity and categorization already existed
    Unchanged,
    /// Replaced the existing entry, keeping its presence history
    Changed,
}

impl fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Changed => write!(f, "changed"),
        }
    }
}

/// Merges entries into a catalog it borrows for the duration of a session
pub struct CatalogMerger<'a> {
    catalog: &'a mut Catalog,
}

impl<'a> CatalogMerger<'a> {
    pub fn new(catalog: &'a mut Catalog) -> Self {
        Self { catalog }
    }

    /// Reconcile one incoming entry
    ///
    /// A changed entry takes over the existing entry's presence history and
    /// source row before replacing it, so history survives re-imports.
    pub fn merge(&mut self, mut incoming: CatalogEntry) -> MergeStatus {
        let key = incoming.identity_key();

        let Some(existing) = self.catalog.get(&key) else {
            self.catalog.insert(incoming);
            return MergeStatus::New;
        };

        if existing.is_structurally_equal(&incoming) {
            return MergeStatus::Unchanged;
        }

        incoming.carry_forward_from(existing);
        self.catalog.insert(incoming);
        MergeStatus::Changed
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FiscalYear;

    fn entry() -> CatalogEntry {
        CatalogEntry::new("chix brst", "cs", "feesers")
            .with_categories(["meat"])
            .with_weight(Some(40.0), "lbs")
    }

    #[test]
    fn test_new_entry_inserted() {
        let mut catalog = Catalog::new();
        let mut merger = CatalogMerger::new(&mut catalog);
        assert_eq!(merger.merge(entry()), MergeStatus::New);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut catalog = Catalog::new();
        let mut merger = CatalogMerger::new(&mut catalog);

        assert_eq!(merger.merge(entry()), MergeStatus::New);
        let after_first = merger.catalog().clone();
        assert_eq!(merger.merge(entry()), MergeStatus::Unchanged);

        assert_eq!(catalog, after_first);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_unchanged_keeps_existing_history() {
        let mut existing = entry();
        existing.set_presence(FiscalYear::new("FY19"), true);
        let mut catalog = Catalog::from_entries(vec![], vec![existing.clone()]);

        let status = CatalogMerger::new(&mut catalog).merge(entry());
        assert_eq!(status, MergeStatus::Unchanged);
        assert_eq!(catalog.get(&existing.identity_key()), Some(&existing));
    }

    #[test]
    fn test_changed_entry_carries_history_forward() {
        let mut existing = entry();
        existing.set_presence(FiscalYear::new("FY20"), true);
        existing.source_row = Some(14);
        let mut catalog = Catalog::from_entries(vec![], vec![existing]);

        let incoming = entry().with_categories(["meat", "poultry"]);
        let status = CatalogMerger::new(&mut catalog).merge(incoming);

        assert_eq!(status, MergeStatus::Changed);
        let merged = catalog.get("chix brst (feesers) cs").unwrap();
        assert_eq!(merged.categories.count(), 2);
        assert_eq!(merged.presence(&FiscalYear::new("FY20")), Some(true));
        assert_eq!(merged.historical.as_ref().unwrap().len(), 1);
        assert_eq!(merged.source_row, Some(14));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_changed_entry_history_replaced_by_existing() {
        let existing = entry();
        let mut catalog = Catalog::from_entries(vec![], vec![existing]);

        let mut incoming = entry().with_weight(Some(0.0), "lbs");
        incoming.set_presence(FiscalYear::new("FY21"), true);
        CatalogMerger::new(&mut catalog).merge(incoming);

        assert!(catalog.get("chix brst (feesers) cs").unwrap().historical.is_none());
    }
}
