//! Tracing setup: an `EnvFilter` sourced from `RUST_LOG` (default `"info"`)
//! feeding a single stdout `fmt` layer. Trimmed from the teacher's
//! JSON/rolling-file-appender setup — this crate has no config surface that
//! asks for either.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}
