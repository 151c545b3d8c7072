//! Shared setup for the contract suite's integration tests.

use std::sync::Once;

use mock_posts_server::MockServer;
use posts_contract::SuiteConfig;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per process when `RUST_LOG` is set.
#[allow(dead_code)]
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

/// Start a fresh mock posts server and point a suite config at it. The server
/// stops when the returned handle is dropped.
#[allow(dead_code)]
pub fn mock_service() -> (MockServer, SuiteConfig) {
    init_test_logging();
    let server = mock_posts_server::spawn_background().expect("bind mock posts server");
    let config = SuiteConfig::new(server.base_url());
    (server, config)
}
