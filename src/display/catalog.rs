//! Catalog display formatting
//!
//! Tables for catalog listings, revision history and catalog reports.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Catalog, CatalogEntry, FiscalYear};
use crate::services::FrequencyBuckets;
use crate::storage::RevisionInfo;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Item")]
    item_name: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Unit")]
    receive_unit: String,
    #[tabled(rename = "Categories")]
    categories: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

impl From<&CatalogEntry> for EntryRow {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            item_name: entry.item_name.clone(),
            vendor: entry.vendor.clone(),
            receive_unit: entry.receive_unit.clone(),
            categories: entry.categories.count().to_string(),
            weight: format_weight(entry),
        }
    }
}

fn format_weight(entry: &CatalogEntry) -> String {
    match entry.weight_per_unit {
        Some(w) if entry.weight_unit.is_empty() => w.to_string(),
        Some(w) => format!("{} {}", w, entry.weight_unit),
        None => "-".to_string(),
    }
}

fn entry_table<'a>(entries: impl IntoIterator<Item = &'a CatalogEntry>) -> String {
    let rows: Vec<EntryRow> = entries.into_iter().map(EntryRow::from).collect();
    Table::new(rows).with(Style::psql()).to_string()
}

/// Every entry in identity order
pub fn format_catalog_list(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "The catalog is empty.\n\nRun 'foodprint catalog import FILE' to load one."
            .to_string();
    }
    format!("{}\n\n{} entries\n", entry_table(catalog.iter()), catalog.len())
}

pub fn format_uncategorized(entries: &[&CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No uncategorized items.".to_string();
    }
    format!(
        "{}\n\n{} uncategorized items\n",
        entry_table(entries.iter().copied()),
        entries.len()
    )
}

/// Buckets from most to least frequent, skipping items never purchased
pub fn format_frequency_buckets(buckets: &FrequencyBuckets<'_>) -> String {
    let mut output = String::new();

    for (frequency, entries) in buckets.reportable() {
        let years = if frequency == 1 { "year" } else { "years" };
        output.push_str(&format!(
            "Purchased in {} fiscal {} ({} items)\n",
            frequency,
            years,
            entries.len()
        ));
        output.push_str(&entry_table(entries.iter().copied()));
        output.push_str("\n\n");
    }

    if output.is_empty() {
        output.push_str("No purchase history recorded yet.\n");
    }
    if !buckets.untracked.is_empty() {
        output.push_str(&format!(
            "{} items have no purchase history.\n",
            buckets.untracked.len()
        ));
    }
    output
}

#[derive(Tabled)]
struct FiscalYearRow {
    #[tabled(rename = "Item")]
    item_name: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Unit")]
    receive_unit: String,
    #[tabled(rename = "Years Purchased")]
    frequency: usize,
}

pub fn format_fiscal_year(fiscal_year: &FiscalYear, entries: &[(&CatalogEntry, usize)]) -> String {
    if entries.is_empty() {
        return format!("No items recorded as purchased in {}.", fiscal_year);
    }
    let rows: Vec<FiscalYearRow> = entries
        .iter()
        .map(|(entry, frequency)| FiscalYearRow {
            item_name: entry.item_name.clone(),
            vendor: entry.vendor.clone(),
            receive_unit: entry.receive_unit.clone(),
            frequency: *frequency,
        })
        .collect();
    format!(
        "Items purchased in {}:\n{}\n",
        fiscal_year,
        Table::new(rows).with(Style::psql())
    )
}

#[derive(Tabled)]
struct RevisionRow {
    #[tabled(rename = "Rev")]
    number: u32,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Entries")]
    entry_count: usize,
}

/// Revision history, newest last
pub fn format_revision_list(revisions: &[RevisionInfo]) -> String {
    if revisions.is_empty() {
        return "No catalog revisions saved.".to_string();
    }
    let rows: Vec<RevisionRow> = revisions
        .iter()
        .map(|r| RevisionRow {
            number: r.number,
            created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            author: r.author.clone(),
            source: r.source.clone(),
            entry_count: r.entry_count,
        })
        .collect();
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn format_catalog_stats(revisions: &[RevisionInfo], catalog: &Catalog) -> String {
    let mut output = String::new();
    output.push_str(&format!("Revisions:     {}\n", revisions.len()));
    if let Some(latest) = revisions.last() {
        output.push_str(&format!("Current:       {}\n", latest.label));
    }
    output.push_str(&format!("Entries:       {}\n", catalog.len()));
    let years: Vec<&str> = catalog.fiscal_years().iter().map(FiscalYear::as_str).collect();
    if !years.is_empty() {
        output.push_str(&format!("Fiscal years:  {}\n", years.join(", ")));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CatalogQuery;

    #[test]
    fn test_empty_catalog_message() {
        assert!(format_catalog_list(&Catalog::new()).contains("empty"));
    }

    #[test]
    fn test_catalog_list_has_rows() {
        let catalog = Catalog::from_entries(
            vec![],
            vec![CatalogEntry::new("milk", "gal", "hood")
                .with_categories(["dairy"])
                .with_weight(Some(8.6), "lbs")],
        );
        let out = format_catalog_list(&catalog);
        assert!(out.contains("milk"));
        assert!(out.contains("8.6 lbs"));
        assert!(out.contains("1 entries"));
    }

    #[test]
    fn test_frequency_report_skips_zero_bucket() {
        let mut seen = CatalogEntry::new("milk", "gal", "hood");
        seen.set_presence(FiscalYear::new("FY20"), true);
        let mut unseen = CatalogEntry::new("kale", "cs", "farm");
        unseen.set_presence(FiscalYear::new("FY20"), false);

        let catalog = Catalog::from_entries(vec![FiscalYear::new("FY20")], vec![seen, unseen]);
        let query = CatalogQuery::new("dollars", "non-food related");
        let out = format_frequency_buckets(&query.bucket_by_frequency(&catalog));

        assert!(out.contains("Purchased in 1 fiscal year (1 items)"));
        assert!(out.contains("milk"));
        assert!(!out.contains("kale"));
    }

    #[test]
    fn test_stats() {
        let catalog = Catalog::from_entries(vec![FiscalYear::new("FY19")], vec![]);
        let out = format_catalog_stats(&[], &catalog);
        assert!(out.contains("Revisions:     0"));
        assert!(out.contains("FY19"));
    }
}
