//! Tracing and logging setup shared by processes embedding the stock ledger.

/// Environment-driven configuration.
pub mod config;

/// Subscriber installation (filters, formatters).
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};

/// Initialize process-wide observability from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&ObservabilityConfig::from_env());
}
