//! Categorization runs
//!
//! A run turns one purchase sheet into per-vendor cost and quantity lines.
//! Each line is enriched with the catalog entry of the same identity when
//! there is one; the catalog itself is only read.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::PurchaseColumns;
use crate::error::FoodprintResult;
use crate::models::Catalog;
use crate::notify::Notifier;
use crate::services::grouper::{ItemGrouper, RowFailure};
use crate::tabular::{TabularSink, TabularSource};

/// Rows between progress notices
const PROGRESS_INTERVAL: usize = 500;

/// Summary of a finished categorization run
#[derive(Debug, Clone, Default)]
pub struct CategorizationReport {
    /// Number of (item, unit) groups closed
    pub groups: usize,
    /// Number of aggregated lines written
    pub items: usize,
    pub failures: Vec<RowFailure>,
    /// Identity keys of catalog entries that matched an emitted line
    pub matched_keys: BTreeSet<String>,
    pub elapsed: Duration,
}

/// Runs the grouping pass over purchase sheets
pub struct CategorizationService<'a> {
    columns: &'a PurchaseColumns,
}

impl<'a> CategorizationService<'a> {
    pub fn new(columns: &'a PurchaseColumns) -> Self {
        Self { columns }
    }

    /// Group, aggregate and write every row of `source`
    ///
    /// Row failures are reported through `notifier` and collected in the
    /// report. Only sink errors end the run early.
    pub fn run(
        &self,
        source: &impl TabularSource,
        catalog: &Catalog,
        sink: &mut dyn TabularSink,
        notifier: &dyn Notifier,
    ) -> FoodprintResult<CategorizationReport> {
        let started = Instant::now();
        let rows = source.rows();
        let mut report = CategorizationReport::default();

        notifier.progress(&format!("Categorizing {} purchase rows", rows.len()));

        let mut next_progress = PROGRESS_INTERVAL;
        for group in ItemGrouper::new(rows, self.columns) {
            report.groups += 1;

            for item in &group.items {
                let key = item.identity_key();
                let entry = catalog.get(&key);
                if entry.is_some() {
                    report.matched_keys.insert(key);
                }
                sink.append_item(item, entry)?;
                report.items += 1;
            }

            for failure in group.failures {
                notifier.row_failed(failure.row, &failure.message);
                report.failures.push(failure);
            }

            if group.last + 1 >= next_progress {
                notifier.progress(&format!("Processed {} of {} rows", group.last + 1, rows.len()));
                next_progress += PROGRESS_INTERVAL;
            }
        }

        sink.flush()?;
        report.elapsed = started.elapsed();

        debug!(
            groups = report.groups,
            items = report.items,
            matched = report.matched_keys.len(),
            "categorization run finished"
        );
        notifier.progress(&format!(
            "Wrote {} lines from {} groups in {:.2}s",
            report.items,
            report.groups,
            report.elapsed.as_secs_f64()
        ));

        Ok(report)
    }
}
