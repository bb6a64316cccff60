pub mod analysis;
pub mod report;
pub mod session;
pub mod utils;

pub use analysis::{Analysis, AnalysisResult, Severity};
pub use report::{render_report, BannerState, ReportView, ResultRow};
pub use session::{
    DeviceGateway, OperatorRole, SessionController, SessionSnapshot, SessionStep, SessionTiming,
    SimulatedDeviceGateway,
};

#[cfg(test)]
mod tests;
