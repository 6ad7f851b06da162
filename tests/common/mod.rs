//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use contact_edge::{ContactConfig, HttpServer, Shutdown};

/// A webhook stand-in that records every body it receives.
#[derive(Clone, Default)]
pub struct MockWebhook {
    status: Arc<AtomicU16>,
    received: Arc<Mutex<Vec<Map<String, Value>>>>,
}

#[allow(dead_code)]
impl MockWebhook {
    pub fn received(&self) -> Vec<Map<String, Value>> {
        self.received.lock().unwrap().clone()
    }

    pub fn respond_with(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }
}

async fn record(
    State(hook): State<MockWebhook>,
    Json(body): Json<Map<String, Value>>,
) -> (StatusCode, [(&'static str, &'static str); 1]) {
    hook.received.lock().unwrap().push(body);
    let status = StatusCode::from_u16(hook.status.load(Ordering::SeqCst)).unwrap_or(StatusCode::OK);
    // Apps Script style redirect; the edge must not follow it.
    (status, [("location", "http://127.0.0.1:9/unreachable")])
}

/// Start a mock webhook on an ephemeral port answering with `status`.
pub async fn start_mock_webhook(status: u16) -> (String, MockWebhook) {
    let hook = MockWebhook::default();
    hook.respond_with(status);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/exec", post(record)).with_state(hook.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}/exec"), hook)
}

/// Start the edge with `config` on an ephemeral port. Returns the contact URL.
pub async fn start_edge(mut config: ContactConfig, shutdown: &Shutdown) -> (String, SocketAddr) {
    config.listener.bind_address = "127.0.0.1:0".into();
    let endpoint = config.listener.endpoint_path.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    let (_, config_updates) = mpsc::unbounded_channel();
    let shutdown = shutdown.clone();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://{addr}{endpoint}"), addr)
}

/// Non-pooled client so each test sees fresh connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
