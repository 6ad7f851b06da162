//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming submission:
//!     → antispam.rs (honeypot, fill time; silent success on hit)
//!     → rate_limit.rs (sliding window per client address)
//!     → edge validation and forwarding
//! Outgoing response:
//!     → headers.rs (CORS, security headers)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: the edge re-checks what the client guard checked
//! - Bot detection never surfaces as an error
//! - No trust in client input, including X-Forwarded-For beyond bucketing

pub mod antispam;
pub mod headers;
pub mod rate_limit;

pub use antispam::{detect_bot, BotSignal};
pub use rate_limit::RateLimitLedger;
