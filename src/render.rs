use std::fmt::Write;

use crate::session::Report;

/// Plain-text report for a terminal.
pub fn text(report: &Report) -> String {
    let mut out = String::new();

    if let Some(msg) = &report.message {
        let _ = writeln!(out, "{msg}");
        if !report.results.is_empty() {
            out.push('\n');
        }
    }

    for (i, r) in report.results.iter().enumerate() {
        let cal = match r.calibrated_age {
            Some(cal) => format!("{cal} cal BP"),
            None => "not calibrated".to_string(),
        };
        let _ = writeln!(out, "Sample {}: {} 14C BP → {cal}", i + 1, r.raw_c14_age);

        let context: Vec<String> = [
            r.metadata.location.as_ref().map(|l| format!("location: {l}")),
            r.metadata.material.as_ref().map(|m| format!("material: {m}")),
            r.metadata.soil_ph.map(|ph| format!("soil pH: {ph}")),
            r.metadata.depth_cm.map(|d| format!("depth: {d} cm")),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !context.is_empty() {
            let _ = writeln!(out, "  {}", context.join(", "));
        }

        for w in &r.warnings {
            let _ = writeln!(out, "  - {w}");
        }
    }
    out
}

/// Pretty-printed JSON report.
pub fn json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
