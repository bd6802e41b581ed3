//! Shared helpers for API integration tests

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use scoutline_core::Config;
use scoutline_database::MemoryRepository;
use std::sync::{Arc, Once};
use tempfile::TempDir;
use tokio::net::TcpListener;

static INIT_LOGGER: Once = Once::new();

/// Token accepted by the test server
pub const ADMIN_TOKEN: &str = "integration-admin-token";

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// A running server bound to an ephemeral port
pub struct TestServer {
    /// e.g. `http://127.0.0.1:41234`
    pub base_url: String,
    /// Keeps the media directory alive for the server's lifetime
    pub media_dir: TempDir,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Full URL for a path under `/api/v1`
    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start the API on the in-memory store with [`ADMIN_TOKEN`] configured
pub async fn spawn_server() -> TestServer {
    init_test_logging();

    let media_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.media_dir = media_dir.path().to_path_buf();
    config.storage.max_file_size = 1024;
    config.security.admin_token_hashes = vec![format!("{:x}", md5::compute(ADMIN_TOKEN))];

    let app = scoutline_api::build_router(config, Arc::new(MemoryRepository::new())).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        media_dir,
        handle,
    }
}

/// Create a test HTTP client
pub fn create_test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap()
}

/// Valid profile creation body
pub fn profile_json(first_name: &str, kind: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": kind,
        "first_name": first_name,
        "last_name": "Pereira",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "sport": "football",
        "position": "centerBack",
        "nationality": "pt",
        "height_cm": 188
    })
}
