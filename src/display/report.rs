//! Summaries printed after commands finish

use crate::audit::SessionEntry;
use crate::backup::BackupInfo;
use crate::services::{CategorizationReport, ImportReport, RowFailure};

fn format_failures(output: &mut String, failures: &[RowFailure]) {
    if failures.is_empty() {
        return;
    }
    output.push_str(&format!("\nSkipped {} rows:\n", failures.len()));
    for failure in failures {
        output.push_str(&format!("  row {}: {}\n", failure.row, failure.message));
    }
}

pub fn format_categorization_report(report: &CategorizationReport) -> String {
    let mut output = format!(
        "Categorization complete: {} lines from {} item groups ({} matched the catalog) in {:.2}s\n",
        report.items,
        report.groups,
        report.matched_keys.len(),
        report.elapsed.as_secs_f64()
    );
    format_failures(&mut output, &report.failures);
    output
}

pub fn format_import_report(report: &ImportReport) -> String {
    let mut output = format!(
        "Import complete: {} new, {} unchanged, {} changed\n",
        report.new, report.unchanged, report.changed
    );
    if !report.fiscal_years_seen.is_empty() {
        let years: Vec<String> = report
            .fiscal_years_seen
            .iter()
            .map(ToString::to_string)
            .collect();
        output.push_str(&format!("Fiscal years: {}\n", years.join(", ")));
    }
    format_failures(&mut output, &report.failures);
    output
}

pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let name_width = backups.iter().map(|b| b.filename.len()).max().unwrap_or(8).max(8);
    let mut output = format!(
        "{:<width$}  {:<12}  {:>10}\n",
        "Backup",
        "User",
        "Size",
        width = name_width
    );
    for backup in backups {
        output.push_str(&format!(
            "{:<width$}  {:<12}  {:>10}\n",
            backup.filename,
            backup.user,
            format_size(backup.size_bytes),
            width = name_width
        ));
    }
    output
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_session_entries(entries: &[SessionEntry]) -> String {
    if entries.is_empty() {
        return "The session log is empty.".to_string();
    }
    entries
        .iter()
        .map(|e| format!("{}\n", e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_report_lists_failures() {
        let report = ImportReport {
            new: 3,
            failures: vec![RowFailure {
                row: 7,
                message: "bad weight".into(),
            }],
            ..ImportReport::default()
        };
        let out = format_import_report(&report);
        assert!(out.contains("3 new"));
        assert!(out.contains("Skipped 1 rows"));
        assert!(out.contains("row 7: bad weight"));
    }

    #[test]
    fn test_clean_run_has_no_failure_section() {
        let out = format_categorization_report(&CategorizationReport::default());
        assert!(out.starts_with("Categorization complete"));
        assert!(!out.contains("Skipped"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
