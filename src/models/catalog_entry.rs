//! Canonical catalog entry
//!
//! A `CatalogEntry` is the identity-bearing record of one food item as bought
//! from one vendor in one receive unit, with its category metadata and the
//! fiscal years it was purchased in.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::fiscal_year::FiscalYear;
use crate::config::CATEGORY_SLOTS;

/// Normalized identity of an item: `name (vendor) unit`, lower-cased and trimmed
///
/// Both catalog entries and aggregated purchase lines key on this.
pub fn identity_key(item_name: &str, vendor: &str, receive_unit: &str) -> String {
    format!(
        "{} ({}) {}",
        item_name.trim(),
        vendor.trim(),
        receive_unit.trim()
    )
    .to_lowercase()
    .trim()
    .to_string()
}

/// Up to four category labels in fixed slots
///
/// Empty slots keep their position so the labels write back to the same
/// columns they were read from; only non-empty slots count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTags([String; CATEGORY_SLOTS]);

impl CategoryTags {
    /// Fill slots from `labels`; extras beyond four are dropped
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots: [String; CATEGORY_SLOTS] = Default::default();
        for (slot, label) in slots.iter_mut().zip(labels) {
            *slot = label.into().trim().to_string();
        }
        Self(slots)
    }

    /// Number of non-empty labels
    pub fn count(&self) -> usize {
        self.0.iter().filter(|s| !s.is_empty()).count()
    }

    /// The first slot, which may be empty
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    /// All four slots, empty ones included
    pub fn slots(&self) -> &[String; CATEGORY_SLOTS] {
        &self.0
    }

    /// Non-empty labels in slot order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str).filter(|s| !s.is_empty())
    }
}

/// Per-fiscal-year purchase presence; a missing key means "not yet known"
pub type HistoricalPresence = BTreeMap<FiscalYear, bool>;

/// A canonical food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_name: String,
    pub receive_unit: String,
    pub vendor: String,

    #[serde(default)]
    pub categories: CategoryTags,

    /// Weight of one receive unit; `None` when never provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_per_unit: Option<f64>,

    /// Unit of `weight_per_unit` (lbs, kg, ...), may be empty
    #[serde(default)]
    pub weight_unit: String,

    /// Absent entirely unless historical tracking populated it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical: Option<HistoricalPresence>,

    /// Row this entry was last written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_row: Option<usize>,
}

impl CatalogEntry {
    /// Create an entry with no categories, unknown weight and no history
    pub fn new(
        item_name: impl Into<String>,
        receive_unit: impl Into<String>,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            receive_unit: receive_unit.into(),
            vendor: vendor.into(),
            categories: CategoryTags::default(),
            weight_per_unit: None,
            weight_unit: String::new(),
            historical: None,
            source_row: None,
        }
    }

    /// Set the category labels, filling slots left to right
    pub fn with_categories<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = CategoryTags::new(labels);
        self
    }

    /// Set the weight of one receive unit and its unit
    pub fn with_weight(mut self, weight_per_unit: Option<f64>, weight_unit: impl Into<String>) -> Self {
        self.weight_per_unit = weight_per_unit;
        self.weight_unit = weight_unit.into();
        self
    }

    /// Attach a presence history
    pub fn with_historical(mut self, historical: HistoricalPresence) -> Self {
        self.historical = Some(historical);
        self
    }

    /// Normalized `name (vendor) unit` key this entry is stored under
    pub fn identity_key(&self) -> String {
        identity_key(&self.item_name, &self.vendor, &self.receive_unit)
    }

    /// Same identity and same categorization particulars
    ///
    /// Compares category count, weight unit and weight per unit. Historical
    /// presence and the source row are not part of equality.
    pub fn is_structurally_equal(&self, other: &CatalogEntry) -> bool {
        self.identity_key() == other.identity_key()
            && self.categories.count() == other.categories.count()
            && self.weight_unit == other.weight_unit
            && self.weight_per_unit == other.weight_per_unit
    }

    /// Take over the presence history and row reference of the entry this
    /// one replaces
    pub fn carry_forward_from(&mut self, previous: &CatalogEntry) {
        self.historical = previous.historical.clone();
        self.source_row = previous.source_row;
    }

    /// Record whether the item was purchased in `fiscal_year`
    ///
    /// Starts a history if the entry had none.
    pub fn set_presence(&mut self, fiscal_year: FiscalYear, present: bool) {
        self.historical
            .get_or_insert_with(BTreeMap::new)
            .insert(fiscal_year, present);
    }

    /// Three-way presence: `None` when unknown
    pub fn presence(&self, fiscal_year: &FiscalYear) -> Option<bool> {
        self.historical
            .as_ref()
            .and_then(|h| h.get(fiscal_year).copied())
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.item_name,
            self.vendor,
            self.categories.count()
        )
    }
}
