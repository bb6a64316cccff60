use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::analysis::{Analysis, AnalysisResult, Severity};

/// Transport boundary to the physical hub. Both operations are opaque to the
/// session core: no timing, retry, or payload assumptions beyond these two
/// contracts.
#[async_trait]
pub trait DeviceGateway: Send + Sync {
    /// Discover and pair with a hub. `Ok(false)` means the scan finished
    /// without finding one.
    async fn scan(&self) -> Result<bool>;

    /// Capture a strip image on the hub camera and run parameter inference.
    async fn capture_and_analyze(&self) -> Result<Analysis>;
}

/// Stand-in for the WebSocket link to the hub. Replace with a real transport
/// to talk to actual hardware; the delays below approximate scan and
/// inference time on the device.
pub struct SimulatedDeviceGateway {
    scan_delay: Duration,
    analysis_delay: Duration,
}

impl SimulatedDeviceGateway {
    pub fn new() -> Self {
        Self {
            scan_delay: Duration::from_secs(3),
            analysis_delay: Duration::from_secs(3),
        }
    }

    pub fn with_delays(scan_delay: Duration, analysis_delay: Duration) -> Self {
        Self {
            scan_delay,
            analysis_delay,
        }
    }
}

impl Default for SimulatedDeviceGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceGateway for SimulatedDeviceGateway {
    async fn scan(&self) -> Result<bool> {
        sleep(self.scan_delay).await;
        Ok(true)
    }

    async fn capture_and_analyze(&self) -> Result<Analysis> {
        sleep(self.analysis_delay).await;

        let results = vec![
            AnalysisResult {
                parameter: "Leukocytes".to_string(),
                value: "500 Leu/uL".to_string(),
                severity: Severity::Critical,
                reference_range: Some("< 10 Leu/uL".to_string()),
            },
            AnalysisResult {
                parameter: "Nitrites".to_string(),
                value: "Positive".to_string(),
                severity: Severity::Warning,
                reference_range: Some("Negative".to_string()),
            },
            AnalysisResult {
                parameter: "pH".to_string(),
                value: "6.5".to_string(),
                severity: Severity::Normal,
                reference_range: Some("4.5 - 8.0".to_string()),
            },
            AnalysisResult {
                parameter: "Protein".to_string(),
                value: "Negative".to_string(),
                severity: Severity::Normal,
                reference_range: Some("Negative".to_string()),
            },
            AnalysisResult {
                parameter: "Glucose".to_string(),
                value: "Normal".to_string(),
                severity: Severity::Normal,
                reference_range: Some("Normal".to_string()),
            },
        ];

        Ok(Analysis {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            results,
            summary: "Your results indicate signs of a possible urinary tract infection."
                .to_string(),
            recommendation:
                "Recommend microscopy and urine culture verification. Antibiotic sensitivity test suggested."
                    .to_string(),
            image_url: "https://picsum.photos/600/400?grayscale".to_string(),
        })
    }
}
