//! Golf swing analyzer command line.
//!
//! Reads one video path, writes one JSON object to stdout and logs to stderr.

pub mod config;
pub mod logging;
pub mod runner;

pub use config::AnalyzerConfig;
pub use runner::{error_json, run, Command};
