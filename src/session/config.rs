use std::time::Duration;

/// Timing knobs for the session flow.
#[derive(Debug, Clone)]
pub struct SessionTiming {
    /// How long the connection-success toast stays up before the session
    /// advances to the role prompt.
    pub connection_toast_ms: u64,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            connection_toast_ms: 2_000,
        }
    }
}

impl SessionTiming {
    pub fn connection_toast(&self) -> Duration {
        Duration::from_millis(self.connection_toast_ms)
    }
}
