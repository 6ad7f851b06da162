//! How the form reaches the edge endpoint.

use std::future::Future;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::submission::{ContactReply, SubmissionRecord};

/// The request never produced a response.
#[derive(Debug, Error)]
#[error("contact endpoint unreachable: {0}")]
pub struct TransportError(#[from] pub reqwest::Error);

/// What the edge answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeReply {
    pub status: StatusCode,
    /// Parsed body, if it was one of the known JSON shapes.
    pub body: Option<ContactReply>,
}

impl EdgeReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Sends one record and reports the edge's answer.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        record: &SubmissionRecord,
    ) -> impl Future<Output = Result<EdgeReply, TransportError>> + Send;
}

/// JSON POST to the edge endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn send(&self, record: &SubmissionRecord) -> Result<EdgeReply, TransportError> {
        let resp = self.client.post(&self.endpoint).json(record).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        let body = serde_json::from_str::<ContactReply>(&text).ok();

        Ok(EdgeReply { status, body })
    }
}
