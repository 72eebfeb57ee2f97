pub mod builders;
pub mod fake_executor;
pub mod requests;

use std::sync::{Arc, Once};

use hookrunner::engine::{DispatchOptions, Dispatcher};
use hookrunner::hooks::HookRegistry;
use hookrunner::params::GitServiceExtractor;
use tracing_subscriber::{EnvFilter, fmt};

use crate::fake_executor::RecordingExecutor;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Dispatcher over `registry` using the real extractor and a recording
/// executor.
pub fn recording_dispatcher(
    registry: HookRegistry,
    executor: &RecordingExecutor,
    options: DispatchOptions,
) -> Dispatcher {
    Dispatcher::new(
        Arc::new(registry),
        Arc::new(GitServiceExtractor),
        Arc::new(executor.clone()),
        options,
    )
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
