//! Radiocarbon calibration against a tabulated curve, plus rule-based
//! advice on sample reliability and burial context.
//!
//! The curve is loaded once into a [`Calibration`] and passed to
//! everything that needs it; see [`session::Submission::run`] for the
//! request-level flow.

pub mod advisory;
pub mod batch;
pub mod calibrate;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod render;
pub mod session;

pub use calibrate::Calibration;
pub use error::CalibrationError;
