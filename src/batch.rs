use serde::{Deserialize, Serialize};

use crate::advisory;
use crate::calibrate::Calibration;

/// Context shared by every sample of one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadata {
    pub soil_ph: Option<f64>,
    pub depth_cm: Option<f64>,
    pub location: Option<String>,
    pub material: Option<String>,
}

/// One submitted sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInput {
    pub raw_c14_age: f64,
    #[serde(flatten)]
    pub metadata: SampleMetadata,
}

/// Calibration outcome and advice for one sample.
///
/// `calibrated_age` is `None` when the raw age falls outside the curve or
/// no curve is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleResult {
    pub raw_c14_age: f64,
    pub calibrated_age: Option<f64>,
    pub warnings: Vec<String>,
    #[serde(flatten)]
    pub metadata: SampleMetadata,
}

impl SampleInput {
    pub fn evaluate(&self, calibration: &Calibration) -> SampleResult {
        let calibrated_age = calibration.calibrate(self.raw_c14_age);
        let warnings = advisory::advise(
            Some(self.raw_c14_age),
            calibrated_age,
            self.metadata.soil_ph,
            self.metadata.depth_cm,
        );
        SampleResult {
            raw_c14_age: self.raw_c14_age,
            calibrated_age,
            warnings,
            metadata: self.metadata.clone(),
        }
    }
}

/// Calibrate and advise on every raw age, in input order.
pub fn process(
    raw_ages: &[f64],
    calibration: &Calibration,
    metadata: &SampleMetadata,
) -> Vec<SampleResult> {
    raw_ages
        .iter()
        .map(|&raw_c14_age| {
            SampleInput {
                raw_c14_age,
                metadata: metadata.clone(),
            }
            .evaluate(calibration)
        })
        .collect()
}
