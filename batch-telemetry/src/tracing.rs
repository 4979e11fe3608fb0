use std::sync::Once;

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;

/// Guards one-time tracing initialization in test binaries.
static TEST_TRACING: Once = Once::new();

/// Initializes the global tracing subscriber for a service binary.
///
/// The filter is taken from `RUST_LOG` when set, otherwise `info`. The
/// `service` name is attached to every event as a top-level field via the
/// subscriber's target formatting.
pub fn init_tracing(service: &str) -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    tracing::info!(service, "tracing initialized");

    Ok(())
}

/// Initializes tracing for tests.
///
/// Safe to call from every test; only the first call installs the subscriber.
/// Output goes through the test writer so it is captured per test.
pub fn init_test_tracing() {
    TEST_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
