//! Edge rate limiter and forwarder.
//!
//! Defends the webhook from abuse and relays legitimate submissions. The
//! logic here knows nothing about HTTP; `crate::http` adapts requests into
//! [`IncomingSubmission`] and turns an [`Outcome`] back into a response.

pub mod forwarder;
pub mod outcome;
pub mod pipeline;

pub use forwarder::{Forward, ForwardError, WebhookForwarder};
pub use outcome::{ForwardFailure, Invalid, Outcome};
pub use pipeline::{ContactService, IncomingSubmission};
