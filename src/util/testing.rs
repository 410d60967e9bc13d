//! Logging setup shared by unit and integration tests.

use std::env;
use std::sync::Once;

use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Installs a stderr subscriber once per test binary.
///
/// Honors `RUST_LOG`; without it, svisuelte logs at debug level so that
/// tree mutations show up in failing test output.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("svisuelte=debug"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(env_filter),
        );

        // Another harness may already own the global subscriber
        if tracing::dispatcher::has_been_set() {
            return;
        }
        if let Err(e) = subscriber.try_init() {
            eprintln!("Error: Failed to set up logging: {}", e);
        }
        info!(rust_log = ?env::var("RUST_LOG").ok(), "Test Setup complete");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_repeated_calls_when_initializing_then_idempotent() {
        init_test_setup();
        init_test_setup();
    }
}
