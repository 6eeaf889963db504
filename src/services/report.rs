// src/services/report.rs
use log::{error, info};
use std::fmt;
use std::path::Path;

use crate::models::DailyReport;

/// The report artifact is the one input whose failure blocks a render
/// cycle. It is surfaced to the API as a blocking error message, never a
/// process crash.
#[derive(Debug)]
pub enum ReportLoadError {
    Missing(String),
    Corrupt(String),
}

impl fmt::Display for ReportLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLoadError::Missing(msg) => write!(f, "report artifact missing: {}", msg),
            ReportLoadError::Corrupt(msg) => write!(f, "report artifact unreadable: {}", msg),
        }
    }
}

impl std::error::Error for ReportLoadError {}

/// Parse a report artifact from raw JSON text.
pub fn parse_report(raw: &str) -> Result<DailyReport, ReportLoadError> {
    serde_json::from_str(raw).map_err(|e| ReportLoadError::Corrupt(e.to_string()))
}

/// Load the precomputed daily report from disk.
pub fn load_report(path: &Path) -> Result<DailyReport, ReportLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        error!("Could not read report artifact {}: {}", path.display(), e);
        ReportLoadError::Missing(format!("{}: {}", path.display(), e))
    })?;

    let report = parse_report(&raw)?;
    info!("Loaded daily report from {}", path.display());
    Ok(report)
}
