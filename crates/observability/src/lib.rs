//! Process-wide tracing/logging setup.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{LogFormat, init_with};
