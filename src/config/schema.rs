//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the contact edge service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContactConfig {
    /// Listener configuration (bind address, TLS, endpoint path).
    pub listener: ListenerConfig,

    /// Upstream webhook that receives accepted submissions.
    pub webhook: WebhookConfig,

    /// Per-address sliding window limits.
    pub rate_limit: RateLimitConfig,

    /// Honeypot and timing heuristics.
    pub antispam: AntiSpamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,

    /// Path the contact endpoint is mounted on.
    pub endpoint_path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
            endpoint_path: "/api/contact".to_string(),
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook URL. Absence is reported per request, not at startup.
    pub url: Option<String>,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            connect_timeout_secs: 5,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Length of the trailing window in seconds.
    pub window_secs: u64,

    /// Accepted submissions per address inside one window.
    pub max_submissions: usize,

    /// How often idle addresses are swept from the ledger.
    pub sweep_interval_secs: u64,
}

impl RateLimitConfig {
    pub fn window_ms(&self) -> u64 {
        self.window_secs.saturating_mul(1000)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: 60,
            max_submissions: 3,
            sweep_interval_secs: 60,
        }
    }
}

/// Bot heuristics applied before rate limiting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AntiSpamConfig {
    /// Minimum time a form must stay open before submitting, in milliseconds.
    pub min_fill_ms: u64,
}

impl Default for AntiSpamConfig {
    fn default() -> Self {
        Self { min_fill_ms: 3000 }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contact_policy() {
        let config = ContactConfig::default();
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_submissions, 3);
        assert_eq!(config.rate_limit.window_ms(), 60_000);
        assert_eq!(config.antispam.min_fill_ms, 3000);
        assert_eq!(config.listener.endpoint_path, "/api/contact");
        assert!(config.webhook.url.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ContactConfig = toml::from_str(
            r#"
            [webhook]
            url = "https://example.com/hook"

            [rate_limit]
            max_submissions = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.webhook.url.as_deref(), Some("https://example.com/hook"));
        assert_eq!(config.webhook.connect_timeout_secs, 5);
        assert_eq!(config.rate_limit.max_submissions, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert!(config.rate_limit.enabled);
    }
}
