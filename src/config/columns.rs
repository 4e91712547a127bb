//! Column layouts for the tabular shapes foodprint reads and writes
//!
//! Raw purchase files, the canonical catalog and categorization output all
//! place their fields at different positions, so every position is configured
//! here instead of being hard-coded in the passes that use them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::FoodprintError;

/// Number of category slots carried by a catalog entry
pub const CATEGORY_SLOTS: usize = 4;

/// Layout of a raw purchase file (one row per purchased lot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseColumns {
    pub item_name: usize,
    pub receive_unit: usize,
    pub vendor: usize,
    pub quantity: usize,
    pub price: usize,
    /// Whether the first row is a header to skip
    #[serde(default)]
    pub has_header: bool,
}

impl Default for PurchaseColumns {
    fn default() -> Self {
        Self {
            item_name: 0,
            receive_unit: 1,
            vendor: 2,
            quantity: 3,
            price: 4,
            has_header: false,
        }
    }
}

impl PurchaseColumns {
    pub fn validate(&self) -> Result<(), FoodprintError> {
        ensure_distinct(
            "purchase",
            &[
                ("item_name", self.item_name),
                ("receive_unit", self.receive_unit),
                ("vendor", self.vendor),
                ("quantity", self.quantity),
                ("price", self.price),
            ],
        )
    }
}

/// Layout of the canonical catalog sheet
///
/// Every header column after the weight columns is a fiscal-year presence
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumns {
    pub item_name: usize,
    pub receive_unit: usize,
    pub vendor: usize,
    pub categories: [usize; CATEGORY_SLOTS],
    pub weight_per_unit: usize,
    pub weight_unit: usize,
    #[serde(default = "default_true")]
    pub has_header: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            item_name: 0,
            receive_unit: 1,
            vendor: 2,
            categories: [3, 4, 5, 6],
            weight_per_unit: 7,
            weight_unit: 8,
            has_header: true,
        }
    }
}

impl CatalogColumns {
    pub fn validate(&self) -> Result<(), FoodprintError> {
        let mut fields = vec![
            ("item_name", self.item_name),
            ("receive_unit", self.receive_unit),
            ("vendor", self.vendor),
            ("weight_per_unit", self.weight_per_unit),
            ("weight_unit", self.weight_unit),
        ];
        fields.extend(self.categories.iter().map(|&c| ("categories", c)));
        ensure_distinct("catalog", &fields)
    }

    /// First column holding fiscal-year presence markers
    pub fn first_fiscal_year_column(&self) -> usize {
        let fixed = [
            self.item_name,
            self.receive_unit,
            self.vendor,
            self.weight_per_unit,
            self.weight_unit,
        ];
        fixed
            .iter()
            .chain(self.categories.iter())
            .copied()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Layout of the sheet written by a categorization run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputColumns {
    pub item_name: usize,
    pub receive_unit: usize,
    pub vendor: usize,
    pub quantity: usize,
    pub categories: [usize; CATEGORY_SLOTS],
    pub weight_per_unit: usize,
    pub weight_unit: usize,
    pub cost: usize,
}

impl Default for OutputColumns {
    fn default() -> Self {
        Self {
            item_name: 0,
            receive_unit: 1,
            vendor: 2,
            quantity: 3,
            categories: [4, 5, 6, 7],
            weight_per_unit: 8,
            weight_unit: 9,
            cost: 10,
        }
    }
}

impl OutputColumns {
    pub fn validate(&self) -> Result<(), FoodprintError> {
        let mut fields = vec![
            ("item_name", self.item_name),
            ("receive_unit", self.receive_unit),
            ("vendor", self.vendor),
            ("quantity", self.quantity),
            ("weight_per_unit", self.weight_per_unit),
            ("weight_unit", self.weight_unit),
            ("cost", self.cost),
        ];
        fields.extend(self.categories.iter().map(|&c| ("categories", c)));
        ensure_distinct("output", &fields)
    }

    /// Number of cells needed to hold every configured column
    pub fn width(&self) -> usize {
        let mut max = self
            .item_name
            .max(self.receive_unit)
            .max(self.vendor)
            .max(self.quantity)
            .max(self.weight_per_unit)
            .max(self.weight_unit)
            .max(self.cost);
        for &col in &self.categories {
            max = max.max(col);
        }
        max + 1
    }
}

fn ensure_distinct(layout: &str, fields: &[(&str, usize)]) -> Result<(), FoodprintError> {
    let mut seen = HashSet::new();
    for (name, col) in fields {
        if !seen.insert(*col) {
            return Err(FoodprintError::Config(format!(
                "{} layout maps column {} more than once (at '{}')",
                layout, col, name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PurchaseColumns::default().validate().is_ok());
        assert!(CatalogColumns::default().validate().is_ok());
        assert!(OutputColumns::default().validate().is_ok());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let columns = PurchaseColumns {
            price: 3,
            ..PurchaseColumns::default()
        };
        let err = columns.validate().unwrap_err();
        assert!(matches!(err, FoodprintError::Config(_)));
        assert!(err.to_string().contains("column 3"));
    }

    #[test]
    fn test_duplicate_category_column_rejected() {
        let columns = CatalogColumns {
            categories: [3, 4, 4, 6],
            ..CatalogColumns::default()
        };
        assert!(columns.validate().is_err());
    }

    #[test]
    fn test_fiscal_year_columns_follow_weight() {
        let columns = CatalogColumns::default();
        assert_eq!(columns.first_fiscal_year_column(), 9);
    }

    #[test]
    fn test_output_width() {
        assert_eq!(OutputColumns::default().width(), 11);
    }
}
