use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use super::{
    config::SessionTiming,
    gateway::DeviceGateway,
    state::{OperatorRole, SessionSnapshot, SessionState, SessionStep},
};

/// Drives one device-interaction cycle: pair with a hub, pick an operator
/// role, capture a strip image, surface the analysis. All mutation of the
/// session goes through these methods; consumers read snapshots or subscribe
/// to the watch channel.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    gateway: Arc<dyn DeviceGateway>,
    timing: SessionTiming,
    events: Arc<watch::Sender<SessionSnapshot>>,
    role_prompt: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel: Arc<Mutex<CancellationToken>>,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn DeviceGateway>) -> Self {
        Self::with_timing(gateway, SessionTiming::default())
    }

    pub fn with_timing(gateway: Arc<dyn DeviceGateway>, timing: SessionTiming) -> Self {
        let state = SessionState::new();
        let (events, _) = watch::channel(state.snapshot());

        Self {
            state: Arc::new(Mutex::new(state)),
            gateway,
            timing,
            events: Arc::new(events),
            role_prompt: Arc::new(Mutex::new(None)),
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Receiver that yields a fresh snapshot after every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Begin hub discovery. The scanning flag is published before the gateway
    /// call starts, so subscribers never see a gap between the user action and
    /// the busy indicator.
    pub async fn start_scanning(&self) -> Result<SessionSnapshot> {
        let epoch = {
            let mut state = self.state.lock().await;
            if state.step() != SessionStep::Discovery || state.scanning {
                warn!("ignoring scan request in step {:?}", state.step());
                return Ok(state.snapshot());
            }
            state.scanning = true;
            self.publish(&state);
            state.epoch
        };
        let cancel = self.cancel.lock().await.clone();

        info!("scanning for device hub");
        let outcome = tokio::select! {
            result = self.gateway.scan() => Some(result),
            _ = cancel.cancelled() => None,
        };

        let mut state = self.state.lock().await;
        let Some(result) = outcome else {
            info!("scan cancelled by reset");
            return Ok(state.snapshot());
        };
        if state.epoch != epoch {
            info!("discarding scan result from an earlier session cycle");
            return Ok(state.snapshot());
        }

        state.scanning = false;
        match result {
            Ok(true) => {
                info!("device hub paired");
                state.device_paired();
                self.spawn_role_prompt(epoch).await;
            }
            Ok(false) => {
                warn!("scan finished without finding a hub");
            }
            Err(err) => {
                // No user-facing surface for this today; the session just
                // stays in Discovery for another attempt.
                error!("device scan failed: {err:#}");
            }
        }
        self.publish(&state);
        Ok(state.snapshot())
    }

    /// Choose who is operating the device; results are shaped accordingly.
    pub async fn select_role(&self, role: OperatorRole) -> Result<SessionSnapshot> {
        let mut state = self.state.lock().await;
        if role == OperatorRole::Unselected {
            warn!("ignoring role selection without a role");
            return Ok(state.snapshot());
        }
        if state.step() != SessionStep::RoleSelection {
            warn!("ignoring role selection in step {:?}", state.step());
            return Ok(state.snapshot());
        }

        state.assign_role(role);
        info!("operator role set to {role:?}");
        self.publish(&state);
        Ok(state.snapshot())
    }

    /// Direct entry into the camera step for flows that skip role selection.
    pub async fn start_camera_flow(&self) -> Result<SessionSnapshot> {
        let mut state = self.state.lock().await;
        if state.busy() {
            warn!("ignoring camera flow request while an operation is in flight");
            return Ok(state.snapshot());
        }

        state.enter_camera();
        self.publish(&state);
        Ok(state.snapshot())
    }

    /// Capture the aligned strip and run the analysis. The session enters
    /// Processing synchronously, before the gateway future is first polled.
    pub async fn capture_image(&self) -> Result<SessionSnapshot> {
        let epoch = {
            let mut state = self.state.lock().await;
            if state.step() != SessionStep::CameraCalibration {
                warn!("ignoring capture request in step {:?}", state.step());
                return Ok(state.snapshot());
            }
            state.begin_processing();
            self.publish(&state);
            state.epoch
        };
        let cancel = self.cancel.lock().await.clone();

        info!("capturing sample image");
        let outcome = tokio::select! {
            result = self.gateway.capture_and_analyze() => Some(result),
            _ = cancel.cancelled() => None,
        };

        let mut state = self.state.lock().await;
        let Some(result) = outcome else {
            info!("capture cancelled by reset");
            return Ok(state.snapshot());
        };
        if state.epoch != epoch {
            info!("discarding analysis from an earlier session cycle");
            return Ok(state.snapshot());
        }

        match result {
            Ok(analysis) => {
                info!(
                    "analysis {} complete with {} parameters",
                    analysis.id,
                    analysis.results.len()
                );
                state.finish_processing(analysis);
            }
            Err(err) => {
                error!("capture and analysis failed: {err:#}");
                state.abort_processing();
            }
        }
        self.publish(&state);
        Ok(state.snapshot())
    }

    /// Back to Discovery from anywhere. Invalidates the pending role prompt
    /// and any in-flight scan or capture.
    pub async fn reset(&self) -> SessionSnapshot {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.reset();
            self.publish(&state);
            state.snapshot()
        };

        {
            let mut cancel = self.cancel.lock().await;
            cancel.cancel();
            *cancel = CancellationToken::new();
        }

        if let Some(handle) = self.role_prompt.lock().await.take() {
            handle.abort();
        }

        info!("session reset to discovery");
        snapshot
    }

    /// The connection toast stays up for a fixed beat before the role prompt.
    /// The task re-checks epoch and step under the lock, so a reset issued
    /// during the window never produces a late transition.
    async fn spawn_role_prompt(&self, epoch: u64) {
        let mut guard = self.role_prompt.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let events = self.events.clone();
        let cancel = self.cancel.lock().await.clone();
        let delay = self.timing.connection_toast();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = cancel.cancelled() => return,
            }

            let mut guard = state.lock().await;
            if guard.epoch != epoch || guard.step() != SessionStep::ConnectionSuccess {
                return;
            }
            guard.show_role_prompt();
            let _ = events.send(guard.snapshot());
        });

        *guard = Some(handle);
    }

    fn publish(&self, state: &SessionState) {
        let _ = self.events.send(state.snapshot());
    }
}
