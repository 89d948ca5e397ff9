//! Process-wide tracing setup shared by the binaries.

/// Initialize process-wide tracing.
///
/// The output format comes from `TAGIHAN_LOG_FORMAT` (`json`, the default, or
/// `pretty`); the filter from `RUST_LOG` (default `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::LogFormat;
