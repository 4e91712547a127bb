//! Categorize CLI command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use super::Session;
use crate::audit::SessionAction;
use crate::display::format_categorization_report;
use crate::error::FoodprintResult;
use crate::notify::TracingNotifier;
use crate::services::CategorizationService;
use crate::tabular::{CsvSheetReader, CsvSink};

/// Arguments for a categorization run
#[derive(Args, Debug)]
pub struct CategorizeArgs {
    /// Purchase file (CSV), sorted by item name and receive unit
    pub file: PathBuf,

    /// Where to write the categorized output
    /// (default: `<file>-categorized.csv` next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the categorize command
pub fn handle_categorize_command(session: &Session, args: CategorizeArgs) -> FoodprintResult<()> {
    let settings = &session.settings;
    let store = session.store();
    let mut catalog = store.load_current()?;

    let sheet = CsvSheetReader::new()
        .with_header(settings.purchase_columns.has_header)
        .read_path(&args.file)?;

    let output = args.output.unwrap_or_else(|| default_output_path(&args.file));
    let mut sink = CsvSink::create(&output, settings)?;
    sink.write_item_header()?;

    let service = CategorizationService::new(&settings.purchase_columns);
    let report = service.run(&sheet, &catalog, &mut sink, &TracingNotifier)?;

    if settings.historical_tracking && !report.matched_keys.is_empty() {
        for key in &report.matched_keys {
            catalog.mark_presence(key, &session.fiscal_year);
        }
        store.save_current(&mut catalog, &session.user)?;
        info!(
            fiscal_year = %session.fiscal_year,
            items = report.matched_keys.len(),
            "recorded purchase presence"
        );
    }

    session.record(
        SessionAction::Categorize,
        format!(
            "{} -> {} ({} lines, {} skipped rows)",
            args.file.display(),
            output.display(),
            report.items,
            report.failures.len()
        ),
    )?;

    print!("{}", format_categorization_report(&report));
    println!("Output written to {}", output.display());
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "purchases".to_string());
    input.with_file_name(format!("{}-categorized.csv", stem))
}
