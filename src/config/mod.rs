//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + CONTACT_* environment
//!     → loader.rs (parse, deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → ContactConfig (validated, immutable)
//!     → shared via ArcSwap with the HTTP server
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps the ArcSwap<ContactConfig>
//!     → next request observes the new config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - The rate limit ledger lives outside the config and survives reloads

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::ConfigError;
pub use schema::ContactConfig;
pub use schema::{
    AntiSpamConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, SecurityConfig,
    TimeoutConfig, TlsConfig, WebhookConfig,
};
