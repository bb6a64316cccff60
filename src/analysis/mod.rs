pub mod types;

pub use types::{Analysis, AnalysisResult, Severity};
