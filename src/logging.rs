//! Diagnostic logging setup

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Level used when neither `--verbose` nor `--quiet` is given
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Map `-v`/`-q` flags onto a level
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::WARN;
    }
    match verbose {
        0 => DEFAULT_LEVEL,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise only this crate logs, at `level`.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
