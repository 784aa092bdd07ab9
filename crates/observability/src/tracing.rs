//! Tracing/logging initialization.
//!
//! JSON lines on stderr, filtered by `RUST_LOG`. Stdout stays free for the
//! binaries' own output.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Initialize tracing with `directive` as the fallback filter.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with_default(directive: &str) {
    let filter = filter_or(EnvFilter::try_from_default_env().ok(), directive);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn filter_or(from_env: Option<EnvFilter>, directive: &str) -> EnvFilter {
    from_env.unwrap_or_else(|| {
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
    })
}
