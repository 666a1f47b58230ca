//! Interval Timer - a desktop break reminder
//!
//! Counts down a work interval in a small overlay on every screen, then
//! covers every screen with a five-minute break overlay, and repeats.
//! Controlled from the system tray.

use clap::Parser;

use interval_timer::app;
use interval_timer::cli::Cli;

/// Main entry point
fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.default_log_level());

    if let Err(e) = app::run(cli.app_options()) {
        tracing::error!(error = ?e, "起動に失敗しました");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `default_level`.
fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

// ============================================================================
// Tests
// ============================================================================
