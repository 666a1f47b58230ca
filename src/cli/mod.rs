//! CLI module for the Interval Timer.
//!
//! - `commands`: Argument definitions using clap derive

pub mod commands;

pub use commands::Cli;
