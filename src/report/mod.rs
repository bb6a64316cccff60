pub mod view;

pub use view::{render_report, BannerState, ReportView, ResultRow, REFERENCE_CHART_URL};
