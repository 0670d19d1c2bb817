//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize logging with `default_level` unless `RUST_LOG` overrides it
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(default_level: LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}
