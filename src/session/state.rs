use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStep {
    Discovery,
    ConnectionSuccess,
    RoleSelection,
    CameraCalibration,
    Processing,
    Results,
}

impl Default for SessionStep {
    fn default() -> Self {
        SessionStep::Discovery
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OperatorRole {
    Unselected,
    Patient,
    Medical,
}

impl Default for OperatorRole {
    fn default() -> Self {
        OperatorRole::Unselected
    }
}

/// Where the session currently is, carrying the data that step needs.
/// Results without an analysis, or Processing without a role, cannot be built.
#[derive(Debug, Clone)]
pub enum SessionPhase {
    Discovery,
    ConnectionSuccess,
    RoleSelection,
    CameraCalibration { role: OperatorRole },
    Processing { role: OperatorRole },
    Results { role: OperatorRole, analysis: Analysis },
}

impl SessionPhase {
    pub fn step(&self) -> SessionStep {
        match self {
            SessionPhase::Discovery => SessionStep::Discovery,
            SessionPhase::ConnectionSuccess => SessionStep::ConnectionSuccess,
            SessionPhase::RoleSelection => SessionStep::RoleSelection,
            SessionPhase::CameraCalibration { .. } => SessionStep::CameraCalibration,
            SessionPhase::Processing { .. } => SessionStep::Processing,
            SessionPhase::Results { .. } => SessionStep::Results,
        }
    }

    pub fn role(&self) -> OperatorRole {
        match self {
            SessionPhase::CameraCalibration { role }
            | SessionPhase::Processing { role }
            | SessionPhase::Results { role, .. } => *role,
            _ => OperatorRole::Unselected,
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            SessionPhase::Results { analysis, .. } => Some(analysis),
            _ => None,
        }
    }
}

/// The single mutable session aggregate. Owned by the controller; everyone
/// else sees `SessionSnapshot` values.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub connected: bool,
    pub scanning: bool,
    /// Bumped on every reset. Async completions compare it under the lock
    /// before applying their outcome, so a stale scan or capture can never
    /// touch a session from a later cycle.
    pub epoch: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Discovery,
            connected: false,
            scanning: false,
            epoch: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> SessionStep {
        self.phase.step()
    }

    /// True while a scan or an analysis is in flight.
    pub fn busy(&self) -> bool {
        self.scanning || matches!(self.phase, SessionPhase::Processing { .. })
    }

    pub fn device_paired(&mut self) {
        self.connected = true;
        self.phase = SessionPhase::ConnectionSuccess;
    }

    pub fn show_role_prompt(&mut self) {
        self.phase = SessionPhase::RoleSelection;
    }

    pub fn assign_role(&mut self, role: OperatorRole) {
        self.phase = SessionPhase::CameraCalibration { role };
    }

    /// Direct entry into the camera step, keeping whatever role is set.
    pub fn enter_camera(&mut self) {
        self.phase = SessionPhase::CameraCalibration {
            role: self.phase.role(),
        };
    }

    pub fn begin_processing(&mut self) {
        self.phase = SessionPhase::Processing {
            role: self.phase.role(),
        };
    }

    pub fn finish_processing(&mut self, analysis: Analysis) {
        self.phase = SessionPhase::Results {
            role: self.phase.role(),
            analysis,
        };
    }

    /// Failed capture: back to the camera step so the operator can retry.
    pub fn abort_processing(&mut self) {
        self.phase = SessionPhase::CameraCalibration {
            role: self.phase.role(),
        };
    }

    pub fn reset(&mut self) {
        self.phase = SessionPhase::Discovery;
        self.connected = false;
        self.scanning = false;
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            step: self.step(),
            connected: self.connected,
            role: self.phase.role(),
            busy: self.busy(),
            last_analysis: self.phase.analysis().cloned(),
        }
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub step: SessionStep,
    pub connected: bool,
    pub role: OperatorRole,
    pub busy: bool,
    pub last_analysis: Option<Analysis>,
}
