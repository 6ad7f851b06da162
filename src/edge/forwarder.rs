//! Relay of accepted submissions to the external webhook.

use std::future::Future;
use std::time::{Duration, Instant};
use axum::http::StatusCode;
use reqwest::redirect::Policy;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::WebhookConfig;
use crate::observability::metrics;

/// Errors that can occur while talking to the webhook.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("webhook client could not be built: {0}")]
    Build(#[source] reqwest::Error),

    #[error("webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Something that can deliver a cleaned payload upstream.
pub trait Forward: Send + Sync {
    /// POST `payload` as JSON to `url` and report the upstream status.
    fn forward(
        &self,
        url: &str,
        payload: &Map<String, Value>,
    ) -> impl Future<Output = Result<StatusCode, ForwardError>> + Send;
}

/// Whether the webhook accepted the submission.
///
/// Spreadsheet script endpoints answer a successful POST with a 302 to the
/// result page, so that counts as accepted too.
pub fn is_accepted(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::FOUND
}

/// reqwest-backed forwarder.
#[derive(Clone)]
pub struct WebhookForwarder {
    client: reqwest::Client,
}

impl WebhookForwarder {
    /// Redirects are not followed: the 302 itself is the success signal.
    pub fn new(config: &WebhookConfig) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("contact-edge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ForwardError::Build)?;
        Ok(Self { client })
    }
}

impl Forward for WebhookForwarder {
    async fn forward(&self, url: &str, payload: &Map<String, Value>) -> Result<StatusCode, ForwardError> {
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(ForwardError::Transport)?;

        let status = response.status();
        metrics::record_forward(status.as_u16(), start);
        Ok(status)
    }
}
