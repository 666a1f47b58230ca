//! Command-line definition for the Interval Timer.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::app::AppOptions;

// ============================================================================
// CLI Structure
// ============================================================================

/// Interval Timer - a desktop break reminder
#[derive(Parser, Debug)]
#[command(
    name = "interval-timer",
    version,
    about = "作業と休憩を繰り返すデスクトップ用インターバルタイマー",
    long_about = "トレイに常駐し、作業中は各画面の右上に残り時間を表示します。\n\
                  作業時間が終わると、5分間の休憩画面を全画面に表示します。"
)]
pub struct Cli {
    /// Path of the interval settings file
    #[arg(short, long, value_name = "PATH", value_parser = validate_config_path)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log level used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Converts the arguments into application options.
    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            config_path: self.config.clone(),
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the settings file path.
///
/// - Must not be empty
/// - Must not end with a path separator
fn validate_config_path(s: &str) -> Result<PathBuf, String> {
    if s.trim().is_empty() {
        return Err("設定ファイルのパスは空にできません".to_string());
    }
    if s.ends_with('/') || s.ends_with(std::path::MAIN_SEPARATOR) {
        return Err("設定ファイルのパスにはファイル名を指定してください".to_string());
    }
    Ok(PathBuf::from(s))
}

// ============================================================================
// Tests
// ============================================================================
