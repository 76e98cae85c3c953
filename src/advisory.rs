use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Above this raw age C-14 is considered unreliable.
pub const VERY_OLD_BP: f64 = 50_000.0;
/// Below this raw age modern contamination dominates.
pub const VERY_YOUNG_BP: f64 = 1_000.0;
/// Optimal soil pH window, inclusive.
pub const PH_RANGE: (f64, f64) = (6.5, 7.5);
/// Typical burial depth window in cm, inclusive.
pub const DEPTH_RANGE_CM: (f64, f64) = (30.0, 200.0);

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

/// One piece of advice about a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    InvalidInput,
    OutsideCalibration,
    VeryOld,
    AlternativeMethods,
    VeryYoung,
    AcidicSoil { ph: f64 },
    AlkalineSoil { ph: f64 },
    OptimalPh { ph: f64 },
    ShallowSample { depth_cm: f64 },
    DeepSample { depth_cm: f64 },
    TypicalDepth { depth_cm: f64 },
    Documentation,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::InvalidInput => write!(f, "Invalid input."),
            Advisory::OutsideCalibration => write!(
                f,
                "⚠️ Age outside calibration range. Consider alternative methods (U-series, K-Ar)."
            ),
            Advisory::VeryOld => {
                write!(f, "⚠️ Very old sample (>50k BP). C-14 may be unreliable.")
            }
            Advisory::AlternativeMethods => write!(
                f,
                "Suggested: Uranium-series, K-Ar, or stratigraphic correlation."
            ),
            Advisory::VeryYoung => {
                write!(f, "⚠️ Very young sample. Check for modern contamination.")
            }
            Advisory::AcidicSoil { ph } => write!(
                f,
                "⚠️ Acidic soil (pH {ph}). Consider liming to raise pH; acidic burial conditions degrade collagen."
            ),
            Advisory::AlkalineSoil { ph } => write!(
                f,
                "⚠️ Alkaline soil (pH {ph}). Consider sulfur or organic amendment; carbonate exchange can bias ages."
            ),
            Advisory::OptimalPh { ph } => {
                write!(f, "✅ Soil pH {ph} within optimal range (6.5–7.5).")
            }
            Advisory::ShallowSample { depth_cm } => write!(
                f,
                "⚠️ Shallow sample ({depth_cm} cm < 30 cm). Higher risk of contamination from roots and modern carbon."
            ),
            Advisory::DeepSample { depth_cm } => write!(
                f,
                "📌 Deep sample ({depth_cm} cm > 200 cm). Record stratigraphy and context carefully."
            ),
            Advisory::TypicalDepth { depth_cm } => {
                write!(f, "✅ Depth {depth_cm} cm within typical range (30–200 cm).")
            }
            Advisory::Documentation => write!(
                f,
                "📌 Record soil pH, depth, and pre-treatment protocol for lab notes; request AMS or replicate measurements if uncertainty is large."
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule engine
// ---------------------------------------------------------------------------

/// Derive the ordered advisories for one sample.
///
/// `NaN` metadata counts as absent.  An absent (or `NaN`) raw age
/// short-circuits to [`Advisory::InvalidInput`] alone.
pub fn advisories(
    raw_age: Option<f64>,
    cal_age: Option<f64>,
    soil_ph: Option<f64>,
    depth_cm: Option<f64>,
) -> Vec<Advisory> {
    let Some(raw) = present(raw_age) else {
        return vec![Advisory::InvalidInput];
    };

    let mut out = Vec::new();

    if cal_age.is_none() {
        out.push(Advisory::OutsideCalibration);
    } else if raw > VERY_OLD_BP {
        out.push(Advisory::VeryOld);
        out.push(Advisory::AlternativeMethods);
    } else if raw < VERY_YOUNG_BP {
        out.push(Advisory::VeryYoung);
    }

    if let Some(ph) = present(soil_ph) {
        out.push(if ph < PH_RANGE.0 {
            Advisory::AcidicSoil { ph }
        } else if ph > PH_RANGE.1 {
            Advisory::AlkalineSoil { ph }
        } else {
            Advisory::OptimalPh { ph }
        });
    }

    if let Some(depth_cm) = present(depth_cm) {
        out.push(if depth_cm < DEPTH_RANGE_CM.0 {
            Advisory::ShallowSample { depth_cm }
        } else if depth_cm > DEPTH_RANGE_CM.1 {
            Advisory::DeepSample { depth_cm }
        } else {
            Advisory::TypicalDepth { depth_cm }
        });
    }

    out.push(Advisory::Documentation);
    out
}

/// [`advisories`] rendered as text.
pub fn advise(
    raw_age: Option<f64>,
    cal_age: Option<f64>,
    soil_ph: Option<f64>,
    depth_cm: Option<f64>,
) -> Vec<String> {
    advisories(raw_age, cal_age, soil_ph, depth_cm)
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}
