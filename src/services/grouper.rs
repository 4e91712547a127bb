//! Row grouping for categorization runs
//!
//! Purchase rows arrive sorted by (item name, receive unit). `ItemGrouper`
//! walks them once and yields one `ItemGroup` per contiguous run of rows
//! sharing that pair, with a `VendorTotal` per vendor in the run.
//!
//! Grouping is positional and exact: keys are compared trimmed and
//! lower-cased, nothing is re-sorted, and rows that are out of order simply
//! start a new group.

use std::collections::HashMap;

use crate::config::PurchaseColumns;
use crate::error::RowParseError;
use crate::models::{AggregatedItem, PurchaseRow, VendorTotal};
use crate::tabular::Row;

/// A row whose contribution was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Row index within the source
    pub row: usize,
    pub message: String,
}

impl From<RowParseError> for RowFailure {
    fn from(err: RowParseError) -> Self {
        Self {
            row: err.row,
            message: err.to_string(),
        }
    }
}

/// Parse the purchase fields of one row
pub fn parse_purchase(row: &Row, columns: &PurchaseColumns) -> Result<PurchaseRow, RowParseError> {
    let quantity = row.number(columns.quantity)?;
    let unit_price = row.number(columns.price)?;
    Ok(PurchaseRow {
        row: row.index,
        item_name: row.key_text(columns.item_name),
        receive_unit: row.key_text(columns.receive_unit),
        vendor: row.key_text(columns.vendor),
        quantity,
        unit_price,
    })
}

/// Per-vendor totals in the order vendors were first seen
#[derive(Debug, Default)]
struct VendorTotals {
    totals: Vec<VendorTotal>,
    index: HashMap<String, usize>,
}

impl VendorTotals {
    fn add(&mut self, purchase: &PurchaseRow) {
        match self.index.get(&purchase.vendor) {
            Some(&i) => self.totals[i].add_cost(purchase.unit_price, purchase.quantity),
            None => {
                self.index
                    .insert(purchase.vendor.clone(), self.totals.len());
                self.totals.push(VendorTotal::new(
                    purchase.vendor.clone(),
                    purchase.unit_price,
                    purchase.quantity,
                ));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// One closed group of rows sharing (item name, receive unit)
#[derive(Debug, Clone, PartialEq)]
pub struct ItemGroup {
    pub item_name: String,
    pub receive_unit: String,
    /// Position of the first row of the group in the input slice
    pub first: usize,
    /// Position of the last row consumed; the next group starts after it
    pub last: usize,
    /// One record per vendor, in vendor encounter order
    pub items: Vec<AggregatedItem>,
    /// Rows whose contribution was skipped, one entry per row
    pub failures: Vec<RowFailure>,
}

impl ItemGroup {
    fn record_failure(&mut self, err: RowParseError) {
        if !self.failures.iter().any(|f| f.row == err.row) {
            self.failures.push(err.into());
        }
    }
}

/// Lazily partitions a pre-sorted row slice into item groups
///
/// Finite and not restartable: once exhausted it keeps returning `None`.
pub struct ItemGrouper<'a> {
    rows: &'a [Row],
    columns: &'a PurchaseColumns,
    cursor: usize,
}

impl<'a> ItemGrouper<'a> {
    pub fn new(rows: &'a [Row], columns: &'a PurchaseColumns) -> Self {
        Self {
            rows,
            columns,
            cursor: 0,
        }
    }

    fn key(&self, row: &Row) -> (String, String) {
        (
            row.key_text(self.columns.item_name),
            row.key_text(self.columns.receive_unit),
        )
    }

    /// Close the group that starts at position `start`
    ///
    /// The returned group's `last` is the position of the final row it
    /// consumed, so the caller resumes at `last + 1`. `None` when `start` is
    /// past the end of the rows.
    pub fn group_at(&self, start: usize) -> Option<ItemGroup> {
        let first_row = self.rows.get(start)?;
        let (item_name, receive_unit) = self.key(first_row);

        let mut group = ItemGroup {
            item_name,
            receive_unit,
            first: start,
            last: start,
            items: Vec::new(),
            failures: Vec::new(),
        };

        if first_row.is_blank() {
            return Some(group);
        }

        let key = (group.item_name.clone(), group.receive_unit.clone());
        let mut end = start;
        while end + 1 < self.rows.len() && self.key(&self.rows[end + 1]) == key {
            end += 1;
        }
        group.last = end;

        let mut vendors = VendorTotals::default();
        for row in &self.rows[start..=end] {
            match parse_purchase(row, self.columns) {
                Ok(purchase) => vendors.add(&purchase),
                Err(err) => group.record_failure(err),
            }
        }

        if !vendors.is_empty() {
            group.items = vendors
                .totals
                .iter()
                .map(|total| AggregatedItem::from_total(&group.item_name, &group.receive_unit, total))
                .collect();
        } else {
            // Nothing parsed: fall back to the raw values of the last row
            let last_row = &self.rows[end];
            match parse_purchase(last_row, self.columns) {
                Ok(purchase) => {
                    let total = VendorTotal::new(purchase.vendor, purchase.unit_price, purchase.quantity);
                    group.items.push(AggregatedItem::from_total(
                        &group.item_name,
                        &group.receive_unit,
                        &total,
                    ));
                }
                Err(err) => group.record_failure(err),
            }
        }

        Some(group)
    }
}

impl Iterator for ItemGrouper<'_> {
    type Item = ItemGroup;

    fn next(&mut self) -> Option<ItemGroup> {
        let group = self.group_at(self.cursor)?;
        self.cursor = group.last + 1;
        Some(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[[&str; 5]]) -> Vec<Row> {
        data.iter()
            .enumerate()
            .map(|(i, r)| Row::from_strings(i, r.iter()))
            .collect()
    }

    fn groups(rows: &[Row]) -> Vec<ItemGroup> {
        let columns = PurchaseColumns::default();
        ItemGrouper::new(rows, &columns).collect()
    }

    #[test]
    fn test_boundary_is_item_and_unit_change() {
        let rows = rows(&[
            ["A", "unit1", "V1", "2", "3.0"],
            ["A", "unit1", "V1", "1", "3.0"],
            ["B", "unit1", "V1", "5", "1.0"],
        ]);
        let groups = groups(&rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].items,
            vec![AggregatedItem::new("a", "unit1", "v1", 9.0, 3.0)]
        );
        assert_eq!(
            groups[1].items,
            vec![AggregatedItem::new("b", "unit1", "v1", 5.0, 5.0)]
        );
        assert_eq!(groups[0].last, 1);
        assert_eq!(groups[1].first, 2);
    }

    #[test]
    fn test_vendor_change_does_not_split_group() {
        let rows = rows(&[
            ["milk", "gal", "Hood", "2", "3.0"],
            ["milk", "gal", "Sysco", "4", "2.5"],
            ["milk", "gal", "hood", "1", "3.5"],
        ]);
        let groups = groups(&rows);

        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].items,
            vec![
                AggregatedItem::new("milk", "gal", "hood", 9.5, 3.0),
                AggregatedItem::new("milk", "gal", "sysco", 10.0, 4.0),
            ]
        );
    }

    #[test]
    fn test_totals_independent_of_row_order() {
        let forward = rows(&[
            ["eggs", "cs", "V1", "2", "10"],
            ["eggs", "cs", "V2", "1", "12"],
            ["eggs", "cs", "V1", "3", "11"],
        ]);
        let backward = rows(&[
            ["eggs", "cs", "V1", "3", "11"],
            ["eggs", "cs", "V2", "1", "12"],
            ["eggs", "cs", "V1", "2", "10"],
        ]);

        let mut a = groups(&forward).remove(0).items;
        let mut b = groups(&backward).remove(0).items;
        a.sort_by(|x, y| x.vendor.cmp(&y.vendor));
        b.sort_by(|x, y| x.vendor.cmp(&y.vendor));
        assert_eq!(a, b);
        assert_eq!(a[0].cost, 53.0);
        assert_eq!(a[0].quantity, 5.0);
    }

    #[test]
    fn test_keys_compared_trimmed_and_case_insensitive() {
        let rows = rows(&[
            ["Chix Brst", "CS", "V1", "1", "2"],
            [" chix brst ", "cs ", "V1", "1", "2"],
        ]);
        let groups = groups(&rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items[0].quantity, 2.0);
        assert_eq!(groups[0].items[0].item_name, "chix brst");
    }

    #[test]
    fn test_unsorted_input_is_not_regrouped() {
        let rows = rows(&[
            ["A", "u", "V1", "1", "1"],
            ["B", "u", "V1", "1", "1"],
            ["A", "u", "V1", "1", "1"],
        ]);
        assert_eq!(groups(&rows).len(), 3);
    }

    #[test]
    fn test_bad_row_skipped_within_group() {
        let rows = rows(&[
            ["A", "u", "V1", "2", "3"],
            ["A", "u", "V1", "x", "3"],
            ["A", "u", "V1", "1", "3"],
        ]);
        let groups = groups(&rows);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items[0].cost, 9.0);
        assert_eq!(groups[0].items[0].quantity, 3.0);
        assert_eq!(groups[0].failures.len(), 1);
        assert_eq!(groups[0].failures[0].row, 1);
    }

    #[test]
    fn test_bad_last_row_of_group_skipped() {
        let rows = rows(&[
            ["A", "u", "V1", "2", "3"],
            ["A", "u", "V1", "1", "oops"],
            ["B", "u", "V1", "1", "1"],
        ]);
        let groups = groups(&rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].items[0].cost, 6.0);
        assert_eq!(groups[0].failures[0].row, 1);
        assert!(groups[1].failures.is_empty());
    }

    #[test]
    fn test_all_rows_failing_emits_nothing_and_reports_once() {
        let rows = rows(&[["A", "u", "V1", "n/a", "3"]]);
        let groups = groups(&rows);

        assert_eq!(groups.len(), 1);
        assert!(groups[0].items.is_empty());
        assert_eq!(groups[0].failures.len(), 1);
        assert_eq!(groups[0].failures[0].row, 0);
    }

    #[test]
    fn test_group_at_returns_resume_position() {
        let rows = rows(&[
            ["A", "u", "V1", "1", "1"],
            ["A", "u", "V2", "1", "1"],
            ["A", "u", "V3", "1", "1"],
            ["B", "u", "V1", "1", "1"],
        ]);
        let columns = PurchaseColumns::default();
        let grouper = ItemGrouper::new(&rows, &columns);

        assert_eq!(grouper.group_at(0).unwrap().last, 2);
        assert_eq!(grouper.group_at(1).unwrap().last, 2);
        assert_eq!(grouper.group_at(3).unwrap().last, 3);
        assert!(grouper.group_at(4).is_none());
        assert!(grouper.group_at(100).is_none());
    }

    #[test]
    fn test_blank_row_is_skipped_silently() {
        let mut rows = rows(&[["A", "u", "V1", "1", "1"]]);
        rows.push(Row::from_strings(1, ["", "", "", "", ""]));
        let groups = groups(&rows);

        assert_eq!(groups.len(), 2);
        assert!(groups[1].items.is_empty());
        assert!(groups[1].failures.is_empty());
    }

    #[test]
    fn test_iterator_exhausts() {
        let rows = rows(&[["A", "u", "V1", "1", "1"]]);
        let columns = PurchaseColumns::default();
        let mut grouper = ItemGrouper::new(&rows, &columns);
        assert!(grouper.next().is_some());
        assert!(grouper.next().is_none());
        assert!(grouper.next().is_none());
    }

    #[test]
    fn test_one_malformed_row_in_hundred() {
        let mut data = Vec::new();
        for i in 0..100 {
            let name = format!("item{:03}", i);
            let qty = if i == 57 { "bad".to_string() } else { "1".to_string() };
            data.push(Row::from_strings(i, [name.as_str(), "cs", "v", qty.as_str(), "2"]));
        }
        let groups = groups(&data);

        let emitted: usize = groups.iter().map(|g| g.items.len()).sum();
        let failed: Vec<usize> = groups
            .iter()
            .flat_map(|g| g.failures.iter().map(|f| f.row))
            .collect();
        assert_eq!(emitted, 99);
        assert_eq!(failed, vec![57]);
    }
}
