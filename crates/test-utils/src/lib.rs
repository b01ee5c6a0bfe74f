//! Shared fixtures for runall's integration tests.

pub mod builders;
pub mod fake_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

pub use builders::{CatalogBuilder, ConfigFileBuilder};
pub use fake_executor::{FakeBehaviour, FakeExecutor};

/// Upper bound on any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness's captured writer.
///
/// Only failing tests show their logs (or all tests with `--nocapture`).
/// `RUST_LOG` picks the level, `info` otherwise.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test step did not finish within {TEST_TIMEOUT:?}"),
    }
}
