use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

use crate::batch::{self, SampleMetadata, SampleResult};
use crate::calibrate::Calibration;
use crate::chart::ChartData;
use crate::data::loader;
use crate::error::CalibrationError;

pub const MSG_BAD_AGE: &str = "Could not parse the entered C-14 age. Use a number.";
pub const MSG_NO_NUMERIC: &str = "Uploaded CSV had no numeric column. Expect 'C14_age'.";
pub const MSG_NO_INPUT: &str = "No input provided. Enter a C-14 age or upload CSV.";

// ---------------------------------------------------------------------------
// Submission – one user request
// ---------------------------------------------------------------------------

/// What a user handed in: an optional typed age, an optional uploaded
/// table of ages, and context shared by all of them.  pH and depth stay
/// as text until [`Submission::metadata`] parses them.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub age_text: Option<String>,
    pub upload: Option<PathBuf>,
    pub ph_text: Option<String>,
    pub depth_text: Option<String>,
    pub location: Option<String>,
    pub material: Option<String>,
}

/// The outcome of one submission, independent of rendering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub results: Vec<SampleResult>,
    /// Present when a curve is loaded and there was at least one age.
    pub chart: Option<ChartData>,
    /// Top-level message for the user (last one wins).
    pub message: Option<String>,
}

impl Submission {
    /// Parse the typed age.  Empty or whitespace-only text is no input.
    pub fn typed_age(&self) -> Result<Option<f64>, CalibrationError> {
        let Some(text) = self.age_text.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<f64>()
            .map(Some)
            .map_err(|_| CalibrationError::InvalidInput {
                text: text.to_string(),
            })
    }

    /// Shared sample context.  A pH or depth that is not a number is
    /// logged and treated as absent.
    pub fn metadata(&self) -> SampleMetadata {
        SampleMetadata {
            soil_ph: optional_number(self.ph_text.as_deref(), "soil pH"),
            depth_cm: optional_number(self.depth_text.as_deref(), "depth"),
            location: self.location.clone(),
            material: self.material.clone(),
        }
    }

    /// Collect all raw ages, calibrate them, and build the report.
    ///
    /// A bad typed age or a bad upload sets the message but does not stop
    /// the other input from being processed.
    pub fn run(&self, calibration: &Calibration) -> Report {
        let mut report = Report::default();
        let mut raw_ages = Vec::new();

        match self.typed_age() {
            Ok(Some(age)) => raw_ages.push(age),
            Ok(None) => {}
            Err(err) => {
                warn!("{err}");
                report.message = Some(MSG_BAD_AGE.to_string());
            }
        }

        if let Some(path) = &self.upload {
            match loader::load_sample_ages(path) {
                Ok(ages) => {
                    info!("Read {} ages from {}", ages.len(), path.display());
                    raw_ages.extend(ages);
                }
                Err(CalibrationError::NoNumericColumn) => {
                    report.message = Some(MSG_NO_NUMERIC.to_string());
                }
                Err(err) => {
                    warn!("Upload rejected: {err}");
                    report.message = Some(format!("Failed to read uploaded CSV: {err}"));
                }
            }
        }

        if raw_ages.is_empty() {
            report.message.get_or_insert_with(|| MSG_NO_INPUT.to_string());
            return report;
        }

        report.results = batch::process(&raw_ages, calibration, &self.metadata());
        report.chart = calibration
            .dataset()
            .filter(|ds| !ds.is_empty())
            .map(|ds| ChartData::new(ds, &report.results));
        report
    }
}

fn optional_number(text: Option<&str>, what: &str) -> Option<f64> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;
    let value = loader::parse_number(text);
    if value.is_none() {
        warn!("Ignoring {what} {text:?}: not a number");
    }
    value
}
