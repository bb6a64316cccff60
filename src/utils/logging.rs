//! Process-wide logging setup.

use log::LevelFilter;

/// Initialize env_logger with an `Info` default; `RUST_LOG` overrides it.
/// Safe to call more than once (later calls are ignored), so tests can use it
/// freely.
pub fn init() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .try_init();
}
