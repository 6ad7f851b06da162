//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (windows > 0, limits > 0, addresses parse)
//! - Check the webhook URL is an absolute http(s) URL when set
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ContactConfig → Result<(), Vec<ValidationError>>
//! - A missing webhook URL is not an error here; it is reported per request

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ContactConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("listener.endpoint_path {0:?} must start with '/'")]
    EndpointPath(String),

    #[error("listener.tls paths must not be empty")]
    TlsPaths,

    #[error("webhook.url {url:?} is invalid: {reason}")]
    WebhookUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ContactConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if !config.listener.endpoint_path.starts_with('/') {
        errors.push(ValidationError::EndpointPath(config.listener.endpoint_path.clone()));
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() || tls.key_path.trim().is_empty() {
            errors.push(ValidationError::TlsPaths);
        }
    }

    if let Some(raw) = &config.webhook.url {
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::WebhookUrl {
                url: raw.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::WebhookUrl {
                url: raw.clone(),
                reason: e.to_string(),
            }),
        }
    }
    if config.webhook.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("webhook.connect_timeout_secs"));
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::Zero("rate_limit.window_secs"));
    }
    if config.rate_limit.max_submissions == 0 {
        errors.push(ValidationError::Zero("rate_limit.max_submissions"));
    }
    if config.rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::Zero("rate_limit.sweep_interval_secs"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ContactConfig::default()).is_ok());
    }

    #[test]
    fn test_missing_webhook_is_not_an_error() {
        let mut config = ContactConfig::default();
        config.webhook.url = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ContactConfig::default();
        config.listener.bind_address = "nope".into();
        config.webhook.url = Some("ftp://example.com/x".into());
        config.rate_limit.window_secs = 0;
        config.rate_limit.max_submissions = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::BindAddress("nope".into())));
        assert!(errors.contains(&ValidationError::Zero("rate_limit.window_secs")));
        assert!(matches!(errors[1], ValidationError::WebhookUrl { .. }));
    }

    #[test]
    fn test_relative_webhook_url_rejected() {
        let mut config = ContactConfig::default();
        config.webhook.url = Some("/macros/exec".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::WebhookUrl { .. }));
    }
}
