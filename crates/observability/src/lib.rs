//! Tracing/logging setup shared by every lendbook binary and test harness.

pub mod subscriber;

pub use subscriber::LogFormat;

/// Initialize process-wide logging with the format named by
/// `LENDBOOK_LOG_FORMAT` (`json` or `pretty`, default `json`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("LENDBOOK_LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    subscriber::init(format);
}
