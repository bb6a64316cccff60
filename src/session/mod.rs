pub mod config;
pub mod controller;
pub mod gateway;
pub mod state;

pub use config::SessionTiming;
pub use controller::SessionController;
pub use gateway::{DeviceGateway, SimulatedDeviceGateway};
pub use state::{OperatorRole, SessionPhase, SessionSnapshot, SessionState, SessionStep};
