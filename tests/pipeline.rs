//! End-to-end: calibration file on disk → Calibration → Submission → Report.

use std::io::Write;

use approx::assert_relative_eq;
use radiocal::advisory::{advise, Advisory};
use radiocal::batch::{process, SampleMetadata};
use radiocal::data::loader::{load_calibration, read_table};
use radiocal::data::columns::normalize;
use radiocal::session::Submission;
use radiocal::Calibration;

const CURVE: &str = "\
# Synthetic test curve
Cal BP, 14C Age, Sigma 1, Sigma 2
0, 0, 10, 1
1000, 950, 12, 1
2000, 1900, 14, 1
6000, 5200, 20, 1
9000, 8100, 25, 1
,8500, 1, 1
12000, n/a, 30, 1
";

fn temp_file(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("temp file");
    f.write_all(contents.as_bytes()).expect("write temp file");
    f
}

#[test]
fn loads_intcal_style_file() {
    let file = temp_file(CURVE);

    let names = normalize(read_table(file.path()).unwrap()).column_names();
    assert_eq!(names, vec!["cal_bp", "c14_age", "sigma", "sigma1"]);

    let ds = load_calibration(file.path()).unwrap();
    assert_eq!(ds.len(), 5);
    assert_eq!(ds.c14_range(), Some((0.0, 8100.0)));
    assert_eq!(ds.rows()[1].sigma, Some(12.0));
}

#[test]
fn calibrates_within_range_only() {
    let file = temp_file(CURVE);
    let calibration = Calibration::load(file.path());
    assert!(calibration.is_available());

    assert_relative_eq!(calibration.calibrate(1425.0).unwrap(), 1500.0);
    assert_eq!(calibration.calibrate(8100.0), Some(9000.0));
    assert_eq!(calibration.calibrate(8100.5), None);
    assert_eq!(calibration.calibrate(-1.0), None);
}

#[test]
fn batch_keeps_order_and_advises() {
    let file = temp_file(CURVE);
    let calibration = Calibration::load(file.path());
    let meta = SampleMetadata {
        soil_ph: Some(5.0),
        depth_cm: Some(20.0),
        ..Default::default()
    };

    let results = process(&[5000.0, 8000.0, 3000.0], &calibration, &meta);
    let raws: Vec<f64> = results.iter().map(|r| r.raw_c14_age).collect();
    assert_eq!(raws, vec![5000.0, 8000.0, 3000.0]);

    assert_eq!(
        results[0].warnings,
        vec![
            Advisory::AcidicSoil { ph: 5.0 }.to_string(),
            Advisory::ShallowSample { depth_cm: 20.0 }.to_string(),
            Advisory::Documentation.to_string(),
        ]
    );
}

#[test]
fn missing_columns_leave_calibration_unavailable() {
    let file = temp_file("Year,Age\n1,2\n");
    let calibration = Calibration::load(file.path());
    assert!(!calibration.is_available());

    let report = Submission {
        age_text: Some("60000".into()),
        ..Default::default()
    }
    .run(&calibration);
    assert_eq!(report.results[0].calibrated_age, None);
    assert_eq!(
        report.results[0].warnings,
        advise(Some(60_000.0), None, None, None)
    );
    assert_eq!(report.results[0].warnings.len(), 2);
    assert!(report.chart.is_none());
}

#[test]
fn upload_flows_through_to_chart() {
    let curve = temp_file(CURVE);
    let upload = temp_file("sample,radiocarbon\nA,950\nB,\nC,99999\n");
    let calibration = Calibration::load(curve.path());

    let report = Submission {
        upload: Some(upload.path().to_path_buf()),
        ..Default::default()
    }
    .run(&calibration);

    assert_eq!(report.message, None);
    let chart = report.chart.expect("chart data");
    assert_eq!(chart.curve.first(), Some(&(0.0, 0.0)));
    assert_eq!(chart.samples.len(), 2);
    assert_eq!(chart.samples[0].label.as_deref(), Some("950 → 1000.0"));
    assert_eq!(chart.plotted().count(), 1);
}
