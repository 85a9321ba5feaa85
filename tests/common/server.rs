//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own library database.

use super::constants::*;
use discography_server::server::server::make_app;
use discography_server::server::{RequestsLoggingLevel, ServerConfig};
use discography_server::SqliteLibraryStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated library database
///
/// When dropped, the serving task is aborted and temp resources cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    serve_task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created, the port cannot be bound,
    /// or the server doesn't become ready within the timeout.
    pub async fn spawn() -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_db_dir.path().join("library.db");
        let store =
            SqliteLibraryStore::new(&db_path, 2).expect("Failed to create library store");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server port");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            public_url: None,
        };
        let app = make_app(config, Arc::new(store)).expect("Failed to build router");

        let serve_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        let server = TestServer {
            base_url,
            port,
            _temp_db_dir: temp_db_dir,
            serve_task,
        };
        server.wait_until_ready().await;
        server
    }

    async fn wait_until_ready(&self) {
        let client = reqwest::Client::new();
        let deadline =
            std::time::Instant::now() + Duration::from_secs(SERVER_READY_TIMEOUT_SECS);
        loop {
            if let Ok(response) = client.get(&self.base_url).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            if std::time::Instant::now() > deadline {
                panic!("Test server on port {} did not become ready", self.port);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.serve_task.abort();
    }
}
