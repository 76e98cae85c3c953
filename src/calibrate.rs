use std::path::Path;
use std::sync::Arc;

use log::{debug, error};

use crate::data::loader;
use crate::data::model::CalibrationDataset;

// ---------------------------------------------------------------------------
// Calibration – the injected, read-only curve handle
// ---------------------------------------------------------------------------

/// Process-wide calibration state: either a loaded curve or "unavailable".
///
/// Built once at startup and passed by reference to everything that
/// calibrates.  Cloning shares the same curve.
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    dataset: Option<Arc<CalibrationDataset>>,
}

impl Calibration {
    pub fn new(dataset: CalibrationDataset) -> Self {
        Self {
            dataset: Some(Arc::new(dataset)),
        }
    }

    /// A handle with no curve; every calibration yields `None`.
    pub fn unavailable() -> Self {
        Self { dataset: None }
    }

    /// Load the curve at `path`.  Any failure is logged and leaves the
    /// handle unavailable.
    pub fn load(path: &Path) -> Self {
        match loader::load_calibration(path) {
            Ok(ds) => Self::new(ds),
            Err(err) => {
                error!("Calibration unavailable: {err}");
                Self::unavailable()
            }
        }
    }

    pub fn dataset(&self) -> Option<&CalibrationDataset> {
        self.dataset.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.dataset.is_some()
    }

    /// Calibrated age for `raw_age`, see [`calibrate`].
    pub fn calibrate(&self, raw_age: f64) -> Option<f64> {
        calibrate(raw_age, self.dataset())
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Map a radiocarbon age to a calendar age (cal BP), rounded to 2 decimals.
///
/// Returns `None` when there is no dataset, it is empty, or `raw_age` lies
/// strictly outside the covered `c14_age` range.  Inside the range the
/// curve is interpolated linearly between the bracketing sorted points.
pub fn calibrate(raw_age: f64, dataset: Option<&CalibrationDataset>) -> Option<f64> {
    let ds = dataset.filter(|ds| !ds.is_empty())?;
    let (min_x, max_x) = ds.c14_range()?;
    if raw_age.is_nan() || raw_age < min_x || raw_age > max_x {
        debug!("{raw_age} outside calibration range [{min_x}, {max_x}]");
        return None;
    }
    let y = interp(raw_age, ds.sorted_c14(), ds.sorted_cal_bp());
    Some(round2(y))
}

/// Piecewise-linear interpolation of `fp` over ascending `xp`.
///
/// Expects `xp[0] <= x <= xp[last]`.  Among points sharing an x value the
/// last one in sorted order is used, both at an exact match and as the
/// left end of the following segment.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let last = xp.len() - 1;
    if x >= xp[last] {
        return fp[last];
    }
    // Largest j with xp[j] <= x; x >= xp[0] keeps this at least 0.
    let j = xp.partition_point(|&v| v <= x).saturating_sub(1);
    if xp[j] == x {
        return fp[j];
    }
    let slope = (fp[j + 1] - fp[j]) / (xp[j + 1] - xp[j]);
    let mut y = slope * (x - xp[j]) + fp[j];
    if y.is_nan() {
        y = slope * (x - xp[j + 1]) + fp[j + 1];
        if y.is_nan() && fp[j] == fp[j + 1] {
            y = fp[j];
        }
    }
    y
}

/// Round to 2 decimal places, deciding on the exact binary value.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CalibrationRow;
    use approx::assert_relative_eq;

    fn dataset(points: &[(f64, f64)]) -> CalibrationDataset {
        CalibrationDataset::from_rows(
            points
                .iter()
                .map(|&(c14_age, cal_bp)| CalibrationRow {
                    cal_bp,
                    c14_age,
                    sigma: None,
                })
                .collect(),
        )
    }

    #[test]
    fn unavailable_or_empty_gives_none() {
        assert_eq!(calibrate(5000.0, None), None);
        let empty = dataset(&[]);
        assert_eq!(calibrate(5000.0, Some(&empty)), None);
        assert_eq!(Calibration::unavailable().calibrate(5000.0), None);
    }

    #[test]
    fn interpolates_between_points() {
        let ds = dataset(&[(1000.0, 900.0), (2000.0, 1900.0), (3000.0, 3300.0)]);
        assert_relative_eq!(calibrate(1500.0, Some(&ds)).unwrap(), 1400.0);
        assert_relative_eq!(calibrate(2500.0, Some(&ds)).unwrap(), 2600.0);
    }

    #[test]
    fn exact_matches_and_endpoints() {
        let ds = dataset(&[(1000.0, 900.0), (2000.0, 1900.0), (3000.0, 3300.0)]);
        assert_eq!(calibrate(1000.0, Some(&ds)), Some(900.0));
        assert_eq!(calibrate(2000.0, Some(&ds)), Some(1900.0));
        assert_eq!(calibrate(3000.0, Some(&ds)), Some(3300.0));
    }

    #[test]
    fn outside_range_is_none_not_clamped() {
        let ds = dataset(&[(1000.0, 900.0), (2000.0, 1900.0)]);
        assert_eq!(calibrate(999.99, Some(&ds)), None);
        assert_eq!(calibrate(2000.01, Some(&ds)), None);
        assert_eq!(calibrate(f64::NAN, Some(&ds)), None);
        assert_eq!(calibrate(f64::INFINITY, Some(&ds)), None);
    }

    #[test]
    fn unsorted_input_is_sorted_for_interpolation() {
        let ds = dataset(&[(3000.0, 3300.0), (1000.0, 900.0), (2000.0, 1900.0)]);
        assert_relative_eq!(calibrate(1500.0, Some(&ds)).unwrap(), 1400.0);
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        let ds = dataset(&[(0.0, 0.0), (3.0, 1.0)]);
        assert_eq!(calibrate(1.0, Some(&ds)), Some(0.33));
        assert_eq!(calibrate(2.0, Some(&ds)), Some(0.67));
    }

    #[test]
    fn duplicate_ages_use_last_point() {
        // Two points at c14 = 10: file order keeps 50 before 70.
        let ds = dataset(&[(0.0, 0.0), (10.0, 50.0), (10.0, 70.0), (20.0, 90.0)]);
        assert_eq!(calibrate(10.0, Some(&ds)), Some(70.0));
        assert_eq!(calibrate(15.0, Some(&ds)), Some(80.0));
        assert_eq!(calibrate(5.0, Some(&ds)), Some(25.0));
    }

    #[test]
    fn single_point_dataset() {
        let ds = dataset(&[(100.0, 120.0)]);
        assert_eq!(calibrate(100.0, Some(&ds)), Some(120.0));
        assert_eq!(calibrate(101.0, Some(&ds)), None);
    }

    #[test]
    fn results_stay_between_bracketing_points() {
        let ds = dataset(&[(100.0, 110.0), (200.0, 90.0), (300.0, 400.0), (400.0, 410.0)]);
        let xs = ds.sorted_c14().to_vec();
        let ys = ds.sorted_cal_bp().to_vec();
        for step in 0..=300 {
            let a = 100.0 + step as f64;
            let cal = calibrate(a, Some(&ds)).unwrap();
            let i = xs.iter().rposition(|&x| x <= a).unwrap().min(xs.len() - 2);
            let lo = ys[i].min(ys[i + 1]);
            let hi = ys[i].max(ys[i + 1]);
            assert!(cal >= lo - 0.005 && cal <= hi + 0.005, "{a} → {cal}");
        }
    }

    #[test]
    fn monotonic_curve_gives_monotonic_results() {
        let ds = dataset(&[(0.0, 0.0), (500.0, 480.0), (1200.0, 1500.0), (2000.0, 2100.0)]);
        let mut prev = f64::NEG_INFINITY;
        for step in 0..=200 {
            let cal = calibrate(step as f64 * 10.0, Some(&ds)).unwrap();
            assert!(cal >= prev);
            prev = cal;
        }
    }

    #[test]
    fn round2_uses_the_binary_value() {
        // 2.675 is stored just below the halfway point.
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1234.5678), 1234.57);
        assert_eq!(round2(-1.005), -1.0);
    }

    #[test]
    fn missing_file_degrades_to_unavailable() {
        let cal = Calibration::load(Path::new("/nonexistent/curve.csv"));
        assert!(!cal.is_available());
        assert_eq!(cal.calibrate(1000.0), None);
    }
}
