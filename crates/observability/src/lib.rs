//! Process-wide tracing setup shared by the storefront binaries.

/// Subscriber configuration (filters, formatting).
pub mod tracing;

pub use crate::tracing::{DEFAULT_DIRECTIVE, init_with_default};

/// Initialize structured logging with the `info` default.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    init_with_default(DEFAULT_DIRECTIVE);
}
