
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use crate::analysis::{Analysis, AnalysisResult, Severity};
use crate::session::DeviceGateway;

pub(crate) enum ScanOutcome {
    Found,
    NotFound,
    Fail,
}

/// Scriptable gateway double: fixed outcomes, call counters, and optional
/// gates that hold an operation in flight until the test releases it.
pub(crate) struct TestGateway {
    scan_outcome: ScanOutcome,
    capture_fails: bool,
    pub(crate) scan_calls: AtomicUsize,
    pub(crate) capture_calls: AtomicUsize,
    scan_gate: Option<Arc<Notify>>,
    capture_gate: Option<Arc<Notify>>,
    analysis: Analysis,
}

impl TestGateway {
    pub(crate) fn ok() -> Self {
        Self {
            scan_outcome: ScanOutcome::Found,
            capture_fails: false,
            scan_calls: AtomicUsize::new(0),
            capture_calls: AtomicUsize::new(0),
            scan_gate: None,
            capture_gate: None,
            analysis: sample_analysis(),
        }
    }

    pub(crate) fn scan_not_found() -> Self {
        Self {
            scan_outcome: ScanOutcome::NotFound,
            ..Self::ok()
        }
    }

    pub(crate) fn failing_scan() -> Self {
        Self {
            scan_outcome: ScanOutcome::Fail,
            ..Self::ok()
        }
    }

    pub(crate) fn failing_capture() -> Self {
        Self {
            capture_fails: true,
            ..Self::ok()
        }
    }

    pub(crate) fn gated_scan(gate: Arc<Notify>) -> Self {
        Self {
            scan_gate: Some(gate),
            ..Self::ok()
        }
    }

    pub(crate) fn gated_capture(gate: Arc<Notify>) -> Self {
        Self {
            capture_gate: Some(gate),
            ..Self::ok()
        }
    }
}

#[async_trait]
impl DeviceGateway for TestGateway {
    async fn scan(&self) -> Result<bool> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.scan_gate {
            gate.notified().await;
        }
        match self.scan_outcome {
            ScanOutcome::Found => Ok(true),
            ScanOutcome::NotFound => Ok(false),
            ScanOutcome::Fail => Err(anyhow!("hub unreachable")),
        }
    }

    async fn capture_and_analyze(&self) -> Result<Analysis> {
        self.capture_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.capture_gate {
            gate.notified().await;
        }
        if self.capture_fails {
            return Err(anyhow!("strip not aligned"));
        }
        Ok(self.analysis.clone())
    }
}

/// The two-parameter panel used across the suite: one critical, one normal.
pub(crate) fn sample_analysis() -> Analysis {
    Analysis {
        id: "analysis-1".to_string(),
        timestamp: Utc::now(),
        results: vec![
            AnalysisResult {
                parameter: "Leukocytes".to_string(),
                value: "500 Leu/uL".to_string(),
                severity: Severity::Critical,
                reference_range: Some("< 10 Leu/uL".to_string()),
            },
            AnalysisResult {
                parameter: "pH".to_string(),
                value: "6.5".to_string(),
                severity: Severity::Normal,
                reference_range: Some("4.5 - 8.0".to_string()),
            },
        ],
        summary: "Your results indicate signs of a possible infection.".to_string(),
        recommendation: "Recommend urine culture verification.".to_string(),
        image_url: "https://example.com/capture.jpg".to_string(),
    }
}

pub(crate) async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition was not reached in time");
}
