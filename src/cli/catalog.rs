//! Catalog CLI commands
//!
//! Import, versioning and the catalog reports.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use super::Session;
use crate::audit::SessionAction;
use crate::config::Settings;
use crate::display::{
    format_catalog_list, format_catalog_stats, format_fiscal_year, format_frequency_buckets,
    format_import_report, format_revision_list, format_uncategorized,
};
use crate::error::FoodprintResult;
use crate::models::{CatalogEntry, FiscalYear};
use crate::notify::TracingNotifier;
use crate::services::{CatalogImportService, CatalogQuery};
use crate::tabular::{CsvSheetReader, CsvSink, TabularSink};

/// Catalog subcommands
#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Merge a catalog sheet (CSV) into the catalog and save a new revision
    Import {
        /// Catalog file to import
        file: PathBuf,
    },

    /// Save the catalog as a fresh revision, optionally exporting it
    Clean {
        /// Also write the catalog to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List every catalog entry
    List,

    /// Show saved catalog revisions
    Versions,

    /// Delete a catalog revision
    Remove {
        /// Revision number
        revision: u32,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Items with an explicit zero weight that still need weighing
    Uncategorized {
        /// Also write the items to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Group items by how many fiscal years they were purchased in
    Frequent {
        /// Write one CSV per frequency into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Items purchased in one fiscal year
    FiscalYear {
        /// Fiscal year label, e.g. FY21
        fiscal_year: String,
    },

    /// Revision and entry counts
    Stats,
}

/// Handle a catalog command
pub fn handle_catalog_command(session: &Session, cmd: CatalogCommands) -> FoodprintResult<()> {
    let settings = &session.settings;
    let store = session.store();
    let query = CatalogQuery::from_settings(settings);

    match cmd {
        CatalogCommands::Import { file } => {
            let mut catalog = store.load_current()?;
            let sheet = CsvSheetReader::new()
                .with_header(settings.catalog_columns.has_header)
                .read_path(&file)?;

            let report =
                CatalogImportService::new(settings).import(&mut catalog, &sheet, &TracingNotifier);
            let info = store.save_revision(&mut catalog, &file.display().to_string(), &session.user)?;

            session.record(
                SessionAction::CatalogImport,
                format!(
                    "{} -> {} ({} new, {} changed, {} skipped rows)",
                    file.display(),
                    info.label,
                    report.new,
                    report.changed,
                    report.failures.len()
                ),
            )?;

            print!("{}", format_import_report(&report));
            println!("Saved catalog revision {} ({} entries)", info.number, info.entry_count);
        }

        CatalogCommands::Clean { output } => {
            let mut catalog = store.load_current()?;
            let info = store.save_revision(&mut catalog, "clean", &session.user)?;
            println!("Saved catalog revision {} ({} entries)", info.number, info.entry_count);

            if let Some(path) = &output {
                let entries: Vec<&CatalogEntry> = catalog.iter().collect();
                write_entries(path, settings, catalog.fiscal_years(), &entries)?;
                println!("Catalog written to {}", path.display());
            }
            session.record(SessionAction::CatalogClean, info.label)?;
        }

        CatalogCommands::List => {
            print!("{}", format_catalog_list(&store.load_current()?));
        }

        CatalogCommands::Versions => {
            println!("{}", format_revision_list(&store.list_revisions()?));
        }

        CatalogCommands::Remove { revision, force } => {
            let (info, _) = store.load_revision(revision)?;
            if !force {
                println!(
                    "This will delete catalog revision {} ({} entries, from {}).",
                    info.number, info.entry_count, info.source
                );
                println!("To proceed, run again with --force:");
                println!("  foodprint catalog remove {} --force", revision);
                return Ok(());
            }

            store.remove_revision(revision)?;
            session.record(SessionAction::RevisionRemoved, info.label.clone())?;
            println!("Removed catalog revision {}", info.number);
        }

        CatalogCommands::Uncategorized { output } => {
            let catalog = store.load_current()?;
            let entries = query.uncategorized(&catalog);
            println!("{}", format_uncategorized(&entries));

            if let Some(path) = &output {
                write_entries(path, settings, catalog.fiscal_years(), &entries)?;
                session.record(SessionAction::Export, format!("uncategorized -> {}", path.display()))?;
                println!("Written to {}", path.display());
            }
        }

        CatalogCommands::Frequent { output_dir } => {
            let catalog = store.load_current()?;
            let buckets = query.bucket_by_frequency(&catalog);
            print!("{}", format_frequency_buckets(&buckets));

            if let Some(dir) = &output_dir {
                let mut written = 0;
                for (frequency, entries) in buckets.reportable() {
                    let path = dir.join(format!("frequency-{}.csv", frequency));
                    write_entries(&path, settings, catalog.fiscal_years(), entries)?;
                    written += 1;
                }
                session.record(
                    SessionAction::Export,
                    format!("frequency report -> {}", dir.display()),
                )?;
                println!("Wrote {} files to {}", written, dir.display());
            }
        }

        CatalogCommands::FiscalYear { fiscal_year } => {
            let catalog = store.load_current()?;
            let fiscal_year = FiscalYear::new(fiscal_year);
            let entries = query.in_fiscal_year(&catalog, &fiscal_year);
            println!("{}", format_fiscal_year(&fiscal_year, &entries));
        }

        CatalogCommands::Stats => {
            let revisions = store.list_revisions()?;
            let catalog = store.load_current()?;
            print!("{}", format_catalog_stats(&revisions, &catalog));
        }
    }

    Ok(())
}

/// Write entries in the catalog layout, one presence column per fiscal year
fn write_entries(
    path: &Path,
    settings: &Settings,
    fiscal_years: &[FiscalYear],
    entries: &[&CatalogEntry],
) -> FoodprintResult<()> {
    let mut sink = CsvSink::create(path, settings)?;
    sink.write_catalog_header(fiscal_years)?;
    for entry in entries {
        sink.append_entry(entry, fiscal_years)?;
    }
    sink.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_entries_round_trips_through_import() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.csv");
        let settings = Settings {
            historical_tracking: true,
            ..Settings::default()
        };
        let fys = vec![FiscalYear::new("FY20")];

        let mut entry = CatalogEntry::new("milk", "gal", "hood")
            .with_categories(["dairy"])
            .with_weight(Some(8.5), "lbs");
        entry.set_presence(FiscalYear::new("FY20"), true);

        write_entries(&path, &settings, &fys, &[&entry]).unwrap();

        let sheet = CsvSheetReader::new().with_header(true).read_path(&path).unwrap();
        let mut catalog = crate::models::Catalog::new();
        let report = CatalogImportService::new(&settings).import(
            &mut catalog,
            &sheet,
            &crate::notify::RecordingNotifier::new(),
        );

        assert_eq!(report.new, 1);
        let imported = catalog.get("milk (hood) gal").unwrap();
        assert!(imported.is_structurally_equal(&entry));
        assert_eq!(imported.presence(&FiscalYear::new("FY20")), Some(true));
    }
}
