//! Analysis payload types.
//!
//! An `Analysis` is produced by one capture-and-analyze operation on the hub
//! and is the stable contract for anything downstream of the session (results
//! screen, report export, sharing). Field names cross the UI boundary in
//! camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// Anything outside the normal range counts as flagged, including warnings.
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Severity::Normal)
    }
}

/// One measured strip parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub parameter: String,
    pub value: String,
    pub severity: Severity,
    pub reference_range: Option<String>,
}

/// Full output of one capture. `results` order is display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<AnalysisResult>,
    pub summary: String,
    pub recommendation: String,
    pub image_url: String,
}

impl Analysis {
    /// Number of parameters outside their normal range.
    pub fn flagged_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.severity.is_flagged())
            .count()
    }
}
