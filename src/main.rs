use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use radiocal::config::{Config, OutputFormat, DEFAULT_CALIBRATION_FILE};
use radiocal::render;
use radiocal::session::Submission;
use radiocal::Calibration;

/// Calibrate radiocarbon ages against a tabulated curve.
#[derive(Parser)]
#[command(name = "radiocal", version)]
struct Args {
    /// Calibration curve (delimited text with cal BP and 14C age columns).
    #[arg(long, env = "RADIOCAL_CALIBRATION", default_value = DEFAULT_CALIBRATION_FILE)]
    calibration: PathBuf,

    /// A single radiocarbon age in 14C years BP.
    #[arg(long)]
    age: Option<String>,

    /// Table of ages; uses the C14 age column or the first numeric one.
    #[arg(long)]
    upload: Option<PathBuf>,

    /// Soil pH at the sampling site (ignored if not a number).
    #[arg(long)]
    ph: Option<String>,

    /// Burial depth in centimetres (ignored if not a number).
    #[arg(long)]
    depth: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    material: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the curve and sample points as JSON for plotting.
    #[arg(long)]
    chart: Option<PathBuf>,
}

impl Args {
    fn split(self) -> (Config, Submission) {
        let config = Config {
            calibration_path: self.calibration,
            format: self.format,
            chart_path: self.chart,
        };
        let submission = Submission {
            age_text: self.age,
            upload: self.upload,
            ph_text: self.ph,
            depth_text: self.depth,
            location: self.location,
            material: self.material,
        };
        (config, submission)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let (config, submission) = Args::parse().split();

    let calibration = Calibration::load(&config.calibration_path);
    if let Some(ds) = calibration.dataset() {
        info!(
            "Using {} ({} points)",
            config.calibration_path.display(),
            ds.len()
        );
    }

    let report = submission.run(&calibration);

    match config.format {
        OutputFormat::Text => print!("{}", render::text(&report)),
        OutputFormat::Json => println!("{}", render::json(&report).context("encoding report")?),
    }

    if let Some(path) = &config.chart_path {
        match &report.chart {
            Some(chart) => {
                let text = serde_json::to_string(chart).context("encoding chart data")?;
                std::fs::write(path, text)
                    .with_context(|| format!("writing chart data to {}", path.display()))?;
            }
            None => warn!("No chart data to write"),
        }
    }

    Ok(())
}
