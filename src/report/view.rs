use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Severity};
use crate::session::OperatorRole;

/// Chart shown beside the captured strip so clinicians can compare reagent
/// colors against the standard.
pub const REFERENCE_CHART_URL: &str = "https://placehold.co/600x400?text=Reference+Chart";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BannerState {
    Normal,
    Attention,
}

/// One row of the results list. `reference_range` is populated only for the
/// medical view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub parameter: String,
    pub value: String,
    pub severity: Severity,
    pub reference_range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub banner: BannerState,
    pub body: String,
    pub rows: Vec<ResultRow>,
    pub captured_image_url: Option<String>,
    pub reference_chart_url: Option<String>,
}

/// Shape an analysis for the given operator. Patients get the layman summary
/// and per-parameter values; medical personnel additionally get the clinical
/// recommendation, reference ranges, and both image references. An unselected
/// role gets the patient-level view.
pub fn render_report(role: OperatorRole, analysis: &Analysis) -> ReportView {
    let medical = role == OperatorRole::Medical;

    let banner = if analysis.flagged_count() > 0 {
        BannerState::Attention
    } else {
        BannerState::Normal
    };

    let rows = analysis
        .results
        .iter()
        .map(|result| ResultRow {
            parameter: result.parameter.clone(),
            value: result.value.clone(),
            severity: result.severity,
            reference_range: if medical {
                result.reference_range.clone()
            } else {
                None
            },
        })
        .collect();

    ReportView {
        banner,
        body: if medical {
            analysis.recommendation.clone()
        } else {
            analysis.summary.clone()
        },
        rows,
        captured_image_url: medical.then(|| analysis.image_url.clone()),
        reference_chart_url: medical.then(|| REFERENCE_CHART_URL.to_string()),
    }
}
