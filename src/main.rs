use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;

use foodprint::audit::SessionAction;
use foodprint::cli::{
    handle_backup_command, handle_catalog_command, handle_categorize_command, handle_log_command,
    BackupCommands, CatalogCommands, CategorizeArgs, LogCommands, Session,
};
use foodprint::config::{FoodprintPaths, Settings};
use foodprint::logging::{init_logger, level_for};
use foodprint::models::FiscalYear;

#[derive(Parser, Debug)]
#[command(
    name = "foodprint",
    version,
    about = "Food purchase categorization and canonical food catalog",
    long_about = "foodprint rolls purchase sheets up into per-vendor cost and quantity \
                  lines and keeps a versioned catalog of food items with their \
                  categories, weights and the fiscal years they were bought in."
)]
struct Cli {
    /// Act as this user for this invocation
    #[arg(long, global = true, env = "FOODPRINT_USER")]
    user: Option<String>,

    /// Record presence under this fiscal year (e.g. FY21)
    #[arg(long, global = true)]
    fiscal_year: Option<String>,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Show or change settings
    Config {
        /// Default user name
        #[arg(long)]
        user_name: Option<String>,

        /// Record fiscal-year purchase presence
        #[arg(long)]
        historical_tracking: Option<bool>,

        /// Cell text that marks an item as purchased in a fiscal year
        #[arg(long)]
        presence_marker: Option<String>,
    },

    /// Show or set the fiscal year presence is recorded under
    FiscalYear {
        /// Persist this fiscal year in the settings
        #[arg(long)]
        set: Option<String>,

        /// Go back to deriving the fiscal year from today's date
        #[arg(long, conflicts_with = "set")]
        clear: bool,
    },

    /// Roll a purchase file up into per-vendor lines
    Categorize(CategorizeArgs),

    /// Catalog import, versions and reports
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Catalog backups
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Session log and notes
    #[command(subcommand)]
    Log(LogCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(level_for(cli.verbose, cli.quiet));
    debug!("{:?}", cli);

    let paths = FoodprintPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let session = Session::new(paths, settings, cli.user, cli.fiscal_year);

    match cli.command {
        Some(Commands::Init) => {
            let paths = &session.paths;
            println!("Initializing foodprint at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            if !paths.is_initialized() {
                session.settings.save(paths)?;
            }
            session.record(SessionAction::Init, paths.base_dir().display().to_string())?;
            println!("Initialization complete!");
            println!();
            println!("Run 'foodprint catalog import FILE' to load a catalog.");
        }
        Some(Commands::Config {
            user_name,
            historical_tracking,
            presence_marker,
        }) => {
            let mut settings = session.settings.clone();
            let mut changed = Vec::new();
            if let Some(name) = user_name {
                settings.user_name = name;
                changed.push("user_name");
            }
            if let Some(tracking) = historical_tracking {
                settings.historical_tracking = tracking;
                changed.push("historical_tracking");
            }
            if let Some(marker) = presence_marker {
                settings.presence_marker = marker;
                changed.push("presence_marker");
            }
            if !changed.is_empty() {
                settings.validate()?;
                settings.save(&session.paths)?;
                session.record(SessionAction::ConfigChanged, changed.join(", "))?;
            }
            print_config(&session.paths, &settings);
        }
        Some(Commands::FiscalYear { set, clear }) => {
            if set.is_some() || clear {
                let mut settings = session.settings.clone();
                settings.fiscal_year = set.map(FiscalYear::new).filter(|fy| !fy.is_empty());
                settings.save(&session.paths)?;
                session.record(
                    SessionAction::ConfigChanged,
                    format!("fiscal_year = {}", settings.effective_fiscal_year()),
                )?;
                println!("Fiscal year: {}", settings.effective_fiscal_year());
            } else {
                println!("Fiscal year: {}", session.fiscal_year);
            }
        }
        Some(Commands::Categorize(args)) => handle_categorize_command(&session, args)?,
        Some(Commands::Catalog(cmd)) => handle_catalog_command(&session, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&session, cmd)?,
        Some(Commands::Log(cmd)) => handle_log_command(&session, cmd)?,
        None => {
            println!("foodprint - food purchase categorization and catalog");
            println!();
            println!("Run 'foodprint --help' for usage information.");
        }
    }

    Ok(())
}

fn print_config(paths: &FoodprintPaths, settings: &Settings) {
    println!("foodprint Configuration");
    println!("=======================");
    println!("Data directory:   {}", paths.base_dir().display());
    println!("Catalog:          {}", paths.catalog_dir().display());
    println!("Backups:          {}", paths.backup_dir().display());
    println!("Session log:      {}", paths.session_log().display());
    println!();
    println!("Settings:");
    println!("  User:                {}", settings.user_name);
    println!("  Historical tracking: {}", settings.historical_tracking);
    println!("  Presence marker:     {}", settings.presence_marker);
    println!("  Fiscal year:         {}", settings.effective_fiscal_year());
    println!("  Currency unit:       {}", settings.currency_unit);
    println!("  Non-food label:      {}", settings.non_food_label);
    println!("  Backups kept:        {}", settings.backup_retention.keep);
}
