//! Ordered checks for one submission at the edge.
//!
//! ```text
//! received
//!     → bot heuristics        → bot-filtered   (silent success)
//!     → rate limit            → rate-limited   (429)
//!     → name, phone|email     → invalid        (400)
//!     → strip internal fields
//!     → forward               → forwarded-ok | forwarding-failed
//! ```
//! The first matching step ends the request; later steps never run.

use std::sync::Arc;
use serde_json::{Map, Value};

use crate::config::ContactConfig;
use crate::edge::forwarder::{is_accepted, Forward, WebhookForwarder};
use crate::edge::outcome::{ForwardFailure, Invalid, Outcome};
use crate::observability::metrics;
use crate::security::{detect_bot, RateLimitLedger};
use crate::submission::fields;

/// A submission as it arrived at the edge.
#[derive(Debug, Clone)]
pub struct IncomingSubmission {
    pub payload: Map<String, Value>,
    /// Best-effort client identity used for rate limiting.
    pub client: String,
    /// Host the form was posted from, used when the payload has no `source`.
    pub origin_host: Option<String>,
}

/// The contact endpoint's logic, independent of HTTP.
pub struct ContactService<F = WebhookForwarder> {
    ledger: Arc<RateLimitLedger>,
    forwarder: F,
}

impl<F: Forward> ContactService<F> {
    pub fn new(ledger: Arc<RateLimitLedger>, forwarder: F) -> Self {
        Self { ledger, forwarder }
    }

    pub fn ledger(&self) -> &Arc<RateLimitLedger> {
        &self.ledger
    }

    /// Run the ordered checks and, if they all pass, forward the submission.
    pub async fn handle(
        &self,
        config: &ContactConfig,
        submission: IncomingSubmission,
        now_ms: u64,
    ) -> Outcome {
        let outcome = self.evaluate(config, submission, now_ms).await;
        metrics::record_outcome(outcome.label());
        outcome
    }

    async fn evaluate(
        &self,
        config: &ContactConfig,
        submission: IncomingSubmission,
        now_ms: u64,
    ) -> Outcome {
        let IncomingSubmission { mut payload, client, origin_host } = submission;

        if let Some(signal) = detect_bot(&payload, now_ms, &config.antispam) {
            tracing::info!(client = %client, signal = signal.label(), "Bot detected, dropping submission");
            return Outcome::BotFiltered(signal);
        }

        if config.rate_limit.enabled
            && self.ledger.is_rate_limited(&client, now_ms, &config.rate_limit)
        {
            tracing::warn!(client = %client, "Rate limited");
            return Outcome::RateLimited;
        }

        if let Err(invalid) = check_fields(&payload) {
            tracing::debug!(client = %client, reason = ?invalid, "Rejected submission");
            return Outcome::Invalid(invalid);
        }

        for field in fields::INTERNAL {
            payload.remove(field);
        }
        if !is_truthy(payload.get(fields::SOURCE)) {
            if let Some(host) = origin_host {
                payload.insert(fields::SOURCE.to_string(), Value::String(host));
            }
        }

        let Some(url) = config.webhook.url.as_deref() else {
            tracing::error!("Webhook URL not configured");
            return Outcome::ForwardFailed(ForwardFailure::NotConfigured);
        };

        match self.forwarder.forward(url, &payload).await {
            Ok(status) if is_accepted(status) => {
                tracing::info!(client = %client, status = %status, "Submission forwarded");
                Outcome::Forwarded
            }
            Ok(status) => {
                tracing::error!(status = %status, "Webhook rejected submission");
                Outcome::ForwardFailed(ForwardFailure::Rejected(status))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error forwarding submission");
                Outcome::ForwardFailed(ForwardFailure::Unreachable)
            }
        }
    }
}

/// Presence checks only. Formats are the client's business.
fn check_fields(payload: &Map<String, Value>) -> Result<(), Invalid> {
    match payload.get(fields::NAME) {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        _ => return Err(Invalid::MissingName),
    }

    if !is_truthy(payload.get(fields::PHONE)) && !is_truthy(payload.get(fields::EMAIL)) {
        return Err(Invalid::MissingContact);
    }
    Ok(())
}

/// JSON truthiness: absent, null, false, "", 0 and NaN are all "missing".
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::edge::forwarder::ForwardError;
    use crate::security::BotSignal;

    const NOW: u64 = 1_700_000_100_000;

    /// Records every forwarded payload and answers with a fixed status.
    #[derive(Default)]
    struct RecordingForwarder {
        status: Option<StatusCode>,
        sent: Mutex<Vec<(String, Map<String, Value>)>>,
    }

    impl RecordingForwarder {
        fn answering(status: StatusCode) -> Self {
            Self { status: Some(status), sent: Mutex::default() }
        }

        fn unreachable() -> Self {
            Self::default()
        }

        fn sent(&self) -> Vec<(String, Map<String, Value>)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Forward for RecordingForwarder {
        async fn forward(&self, url: &str, payload: &Map<String, Value>) -> Result<StatusCode, ForwardError> {
            self.sent.lock().unwrap().push((url.to_string(), payload.clone()));
            match self.status {
                Some(status) => Ok(status),
                None => {
                    let err = reqwest::Client::new().get("not a url").build().unwrap_err();
                    Err(ForwardError::Transport(err))
                }
            }
        }
    }

    fn config() -> ContactConfig {
        let mut config = ContactConfig::default();
        config.webhook.url = Some("https://hooks.example.com/exec".into());
        config
    }

    fn service(forwarder: RecordingForwarder) -> ContactService<RecordingForwarder> {
        ContactService::new(Arc::new(RateLimitLedger::new()), forwarder)
    }

    fn submission(body: Value, client: &str) -> IncomingSubmission {
        let Value::Object(payload) = body else { unreachable!() };
        IncomingSubmission {
            payload,
            client: client.to_string(),
            origin_host: Some("pizzatuba.ee".into()),
        }
    }

    fn valid() -> Value {
        json!({
            "name": "Mari",
            "email": "mari@test.ee",
            "_gotcha": "",
            "_loadTime": NOW - 5000,
        })
    }

    #[tokio::test]
    async fn test_valid_submission_is_forwarded_clean() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let outcome = svc.handle(&config(), submission(valid(), "10.0.0.1"), NOW).await;

        assert_eq!(outcome, Outcome::Forwarded);
        let sent = svc.forwarder.sent();
        assert_eq!(sent.len(), 1);
        let (url, payload) = &sent[0];
        assert_eq!(url, "https://hooks.example.com/exec");
        assert!(!payload.contains_key("_gotcha"));
        assert!(!payload.contains_key("_loadTime"));
        assert_eq!(payload["name"], "Mari");
        assert_eq!(payload["source"], "pizzatuba.ee");
    }

    #[tokio::test]
    async fn test_client_source_is_kept() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let mut body = valid();
        body["source"] = json!("www.pizzatuba.ee");
        svc.handle(&config(), submission(body, "10.0.0.1"), NOW).await;

        assert_eq!(svc.forwarder.sent()[0].1["source"], "www.pizzatuba.ee");
    }

    #[tokio::test]
    async fn test_honeypot_short_circuits_everything() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let body = json!({"name": "", "_gotcha": "spam", "_loadTime": NOW - 5000});
        let outcome = svc.handle(&config(), submission(body, "10.0.0.1"), NOW).await;

        assert_eq!(outcome, Outcome::BotFiltered(BotSignal::Honeypot));
        assert!(svc.forwarder.sent().is_empty());
        assert_eq!(svc.ledger().recent("10.0.0.1", NOW, 60_000), 0);
    }

    #[tokio::test]
    async fn test_fast_submission_is_filtered() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let mut body = valid();
        body["_loadTime"] = json!(NOW - 1200);
        let outcome = svc.handle(&config(), submission(body, "10.0.0.1"), NOW).await;

        assert!(matches!(outcome, Outcome::BotFiltered(BotSignal::TooFast { elapsed_ms: 1200 })));
        assert!(svc.forwarder.sent().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_precedes_validation() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let cfg = config();
        for i in 0..3 {
            let outcome = svc.handle(&cfg, submission(valid(), "10.0.0.2"), NOW + i).await;
            assert_eq!(outcome, Outcome::Forwarded);
        }

        let invalid = json!({"name": "", "_loadTime": NOW - 5000});
        let outcome = svc.handle(&cfg, submission(invalid, "10.0.0.2"), NOW + 10).await;
        assert_eq!(outcome, Outcome::RateLimited);
        assert_eq!(svc.forwarder.sent().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_requests_still_count_toward_limit() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let cfg = config();
        let invalid = json!({"name": "   "});
        for _ in 0..3 {
            let outcome = svc.handle(&cfg, submission(invalid.clone(), "10.0.0.3"), NOW).await;
            assert_eq!(outcome, Outcome::Invalid(Invalid::MissingName));
        }
        let outcome = svc.handle(&cfg, submission(valid(), "10.0.0.3"), NOW).await;
        assert_eq!(outcome, Outcome::RateLimited);
    }

    #[tokio::test]
    async fn test_disabled_rate_limit() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let mut cfg = config();
        cfg.rate_limit.enabled = false;
        for _ in 0..5 {
            let outcome = svc.handle(&cfg, submission(valid(), "10.0.0.4"), NOW).await;
            assert_eq!(outcome, Outcome::Forwarded);
        }
    }

    #[tokio::test]
    async fn test_field_checks() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let mut cfg = config();
        cfg.rate_limit.enabled = false;

        let cases = [
            (json!({"email": "a@b.ee"}), Outcome::Invalid(Invalid::MissingName)),
            (json!({"name": 42, "email": "a@b.ee"}), Outcome::Invalid(Invalid::MissingName)),
            (json!({"name": "Mari"}), Outcome::Invalid(Invalid::MissingContact)),
            (json!({"name": "Mari", "phone": "", "email": null}), Outcome::Invalid(Invalid::MissingContact)),
            (json!({"name": "Mari", "phone": "+372 5555"}), Outcome::Forwarded),
            (json!({"name": "Mari", "email": "not-validated-here"}), Outcome::Forwarded),
        ];

        for (body, expected) in cases {
            let outcome = svc.handle(&cfg, submission(body.clone(), "10.0.0.5"), NOW).await;
            assert_eq!(outcome, expected, "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_missing_webhook_url() {
        let svc = service(RecordingForwarder::answering(StatusCode::OK));
        let mut cfg = config();
        cfg.webhook.url = None;
        let outcome = svc.handle(&cfg, submission(valid(), "10.0.0.6"), NOW).await;

        assert_eq!(outcome, Outcome::ForwardFailed(ForwardFailure::NotConfigured));
        assert!(svc.forwarder.sent().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_statuses() {
        let cfg = config();

        let redirect = service(RecordingForwarder::answering(StatusCode::FOUND));
        assert_eq!(redirect.handle(&cfg, submission(valid(), "a"), NOW).await, Outcome::Forwarded);

        let failing = service(RecordingForwarder::answering(StatusCode::BAD_GATEWAY));
        assert_eq!(
            failing.handle(&cfg, submission(valid(), "a"), NOW).await,
            Outcome::ForwardFailed(ForwardFailure::Rejected(StatusCode::BAD_GATEWAY))
        );

        let down = service(RecordingForwarder::unreachable());
        assert_eq!(
            down.handle(&cfg, submission(valid(), "a"), NOW).await,
            Outcome::ForwardFailed(ForwardFailure::Unreachable)
        );
    }
}
