//! Purchase-line models
//!
//! A categorization run turns `PurchaseRow`s into one `AggregatedItem` per
//! (item, unit, vendor), accumulating through a `VendorTotal`.

use serde::{Deserialize, Serialize};

use super::catalog_entry::identity_key;

/// One purchased lot as read from a raw purchase file
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRow {
    /// Row index within the source sheet
    pub row: usize,
    pub item_name: String,
    pub receive_unit: String,
    pub vendor: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Running cost and quantity for one vendor within an item group
///
/// Values are accumulated as given; negative inputs are not rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTotal {
    pub vendor: String,
    total_cost: f64,
    total_quantity: f64,
}

impl VendorTotal {
    /// Start a total from the first lot seen for `vendor`
    pub fn new(vendor: impl Into<String>, price: f64, quantity: f64) -> Self {
        Self {
            vendor: vendor.into(),
            total_cost: price * quantity,
            total_quantity: quantity,
        }
    }

    /// Another lot of the same item from the same vendor
    pub fn add_cost(&mut self, price: f64, quantity: f64) {
        self.total_cost += price * quantity;
        self.total_quantity += quantity;
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn total_quantity(&self) -> f64 {
        self.total_quantity
    }
}

/// Output unit of a categorization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedItem {
    pub item_name: String,
    pub receive_unit: String,
    pub vendor: String,
    pub cost: f64,
    pub quantity: f64,
}

impl AggregatedItem {
    pub fn new(
        item_name: impl Into<String>,
        receive_unit: impl Into<String>,
        vendor: impl Into<String>,
        cost: f64,
        quantity: f64,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            receive_unit: receive_unit.into(),
            vendor: vendor.into(),
            cost,
            quantity,
        }
    }

    /// Build the record emitted for a finished vendor total
    pub fn from_total(item_name: &str, receive_unit: &str, total: &VendorTotal) -> Self {
        Self::new(
            item_name,
            receive_unit,
            total.vendor.clone(),
            total.total_cost(),
            total.total_quantity(),
        )
    }

    /// Key used to look up the matching catalog entry
    pub fn identity_key(&self) -> String {
        identity_key(&self.item_name, &self.vendor, &self.receive_unit)
    }
}
