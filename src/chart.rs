use serde::Serialize;

use crate::batch::SampleResult;
use crate::data::model::CalibrationDataset;

// ---------------------------------------------------------------------------
// Chart data handed to a renderer
// ---------------------------------------------------------------------------

/// A sample overlaid on the curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePoint {
    pub raw_c14_age: f64,
    pub calibrated_age: Option<f64>,
    /// `"{raw} → {cal}"` with `cal` always showing a decimal point
    /// (`1000.0`), present only for calibrated samples.
    pub label: Option<String>,
}

/// Everything a plotter needs: the curve (x = 14C BP, y = cal BP) and the
/// sample points in submission order.  Uncalibrated samples are kept with
/// no label; renderers skip them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub curve: Vec<(f64, f64)>,
    pub samples: Vec<SamplePoint>,
}

impl ChartData {
    pub fn new(dataset: &CalibrationDataset, results: &[SampleResult]) -> Self {
        let samples = results
            .iter()
            .map(|r| SamplePoint {
                raw_c14_age: r.raw_c14_age,
                calibrated_age: r.calibrated_age,
                label: r
                    .calibrated_age
                    .map(|cal| format!("{} → {cal:?}", r.raw_c14_age.trunc())),
            })
            .collect();

        ChartData {
            x_label: "Radiocarbon Age (14C BP)",
            y_label: "Calendar Age (cal BP)",
            curve: dataset.sorted_points(),
            samples,
        }
    }

    /// Samples that have a calendar age, as `(raw, cal)` pairs.
    pub fn plotted(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples
            .iter()
            .filter_map(|s| s.calibrated_age.map(|cal| (s.raw_c14_age, cal)))
    }
}
