use std::path::PathBuf;

use clap::ValueEnum;

/// Calibration curve read at startup when none is configured.
pub const DEFAULT_CALIBRATION_FILE: &str = "intcal20.14c";

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Runtime configuration, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub calibration_path: PathBuf,
    pub format: OutputFormat,
    /// Where to write chart data as JSON, if anywhere.
    pub chart_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calibration_path: PathBuf::from(DEFAULT_CALIBRATION_FILE),
            format: OutputFormat::default(),
            chart_path: None,
        }
    }
}
