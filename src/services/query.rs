//! Read-side queries over the catalog

use crate::config::Settings;
use crate::error::{FoodprintError, FoodprintResult};
use crate::models::{Catalog, CatalogEntry, FiscalYear};

/// Entries partitioned by how many fiscal years they were purchased in
#[derive(Debug, Default)]
pub struct FrequencyBuckets<'c> {
    /// `buckets[n]` holds entries purchased in exactly `n` fiscal years
    pub buckets: Vec<Vec<&'c CatalogEntry>>,
    /// Entries that never had presence data and so have no frequency
    pub untracked: Vec<&'c CatalogEntry>,
}

impl<'c> FrequencyBuckets<'c> {
    pub fn bucket(&self, frequency: usize) -> &[&'c CatalogEntry] {
        self.buckets.get(frequency).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty buckets above zero, most frequent first
    pub fn reportable(&self) -> impl Iterator<Item = (usize, &[&'c CatalogEntry])> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .filter(|(_, b)| !b.is_empty())
            .map(|(n, b)| (n, b.as_slice()))
    }
}

/// Catalog queries that depend on the configured labels
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    currency_unit: String,
    non_food_label: String,
}

impl CatalogQuery {
    pub fn new(currency_unit: impl Into<String>, non_food_label: impl Into<String>) -> Self {
        Self {
            currency_unit: currency_unit.into(),
            non_food_label: non_food_label.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.currency_unit, &settings.non_food_label)
    }

    /// Number of fiscal years the entry was purchased in
    ///
    /// Fails with a precondition error when the entry has no presence data,
    /// so "never observed" is never confused with "observed zero times".
    pub fn frequency(&self, entry: &CatalogEntry) -> FoodprintResult<usize> {
        let history = entry
            .historical
            .as_ref()
            .ok_or_else(|| FoodprintError::missing_history(entry.identity_key()))?;
        Ok(history.values().filter(|&&present| present).count())
    }

    /// Whether the entry was purchased in `fiscal_year`; an unknown year
    /// reads as false
    pub fn is_part_of_fiscal_year(
        &self,
        entry: &CatalogEntry,
        fiscal_year: &FiscalYear,
    ) -> FoodprintResult<bool> {
        let history = entry
            .historical
            .as_ref()
            .ok_or_else(|| FoodprintError::missing_history(entry.identity_key()))?;
        Ok(history.get(fiscal_year).copied().unwrap_or(false))
    }

    /// An explicit zero weight on a food item that is not priced in currency
    ///
    /// Unknown weight is not zero weight and does not count.
    pub fn is_uncategorized(&self, entry: &CatalogEntry) -> bool {
        entry.weight_per_unit == Some(0.0)
            && !entry
                .receive_unit
                .trim()
                .eq_ignore_ascii_case(self.currency_unit.trim())
            && !entry
                .categories
                .first()
                .eq_ignore_ascii_case(self.non_food_label.trim())
    }

    pub fn uncategorized<'c>(&self, catalog: &'c Catalog) -> Vec<&'c CatalogEntry> {
        catalog.iter().filter(|e| self.is_uncategorized(e)).collect()
    }

    /// Entries purchased in `fiscal_year`, with their frequency
    ///
    /// Entries without presence data are skipped.
    pub fn in_fiscal_year<'c>(
        &self,
        catalog: &'c Catalog,
        fiscal_year: &FiscalYear,
    ) -> Vec<(&'c CatalogEntry, usize)> {
        catalog
            .iter()
            .filter_map(|entry| {
                let part = self.is_part_of_fiscal_year(entry, fiscal_year).ok()?;
                let frequency = self.frequency(entry).ok()?;
                part.then_some((entry, frequency))
            })
            .collect()
    }

    /// Partition every entry by frequency
    ///
    /// There is one bucket per possible frequency, from zero up to the number
    /// of fiscal years the catalog knows about.
    pub fn bucket_by_frequency<'c>(&self, catalog: &'c Catalog) -> FrequencyBuckets<'c> {
        let mut result = FrequencyBuckets {
            buckets: vec![Vec::new(); catalog.fiscal_years().len() + 1],
            untracked: Vec::new(),
        };

        for entry in catalog.iter() {
            match self.frequency(entry) {
                Ok(n) => {
                    if n >= result.buckets.len() {
                        result.buckets.resize_with(n + 1, Vec::new);
                    }
                    result.buckets[n].push(entry);
                }
                Err(_) => result.untracked.push(entry),
            }
        }
        result
    }
}
