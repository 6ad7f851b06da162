//! Terminal states of one edge request and what the client sees for each.

use axum::http::StatusCode;

use crate::security::BotSignal;
use crate::submission::ContactReply;

pub const MSG_RATE_LIMITED: &str = "Liiga palju päringuid. Palun oota minut ja proovi uuesti.";
pub const MSG_NAME_REQUIRED: &str = "Nimi on kohustuslik";
pub const MSG_CONTACT_REQUIRED: &str = "Telefon või email on kohustuslik";
pub const MSG_NOT_CONFIGURED: &str = "Server configuration error";
pub const MSG_UPSTREAM_REJECTED: &str = "Failed to submit form";
pub const MSG_INTERNAL: &str = "Internal server error";
pub const MSG_INVALID_BODY: &str = "Invalid request body";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// A field check the edge failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    /// Body was not a JSON object.
    Body,
    MissingName,
    MissingContact,
}

/// Why forwarding did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardFailure {
    /// No webhook URL configured.
    NotConfigured,
    /// Webhook answered with a status that is not accepted.
    Rejected(StatusCode),
    /// Webhook could not be reached.
    Unreachable,
}

/// Result of handling one submission. Exactly one per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    BotFiltered(BotSignal),
    RateLimited,
    Invalid(Invalid),
    Forwarded,
    ForwardFailed(ForwardFailure),
}

impl Outcome {
    /// Metric and log label.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::BotFiltered(_) => "bot_filtered",
            Outcome::RateLimited => "rate_limited",
            Outcome::Invalid(_) => "invalid",
            Outcome::Forwarded => "forwarded",
            Outcome::ForwardFailed(_) => "forward_failed",
        }
    }

    /// Status and body for the client. Bot hits look like a normal success.
    pub fn reply(&self) -> (StatusCode, ContactReply) {
        match self {
            Outcome::BotFiltered(_) | Outcome::Forwarded => (StatusCode::OK, ContactReply::ok()),
            Outcome::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ContactReply::error(MSG_RATE_LIMITED),
            ),
            Outcome::Invalid(Invalid::Body) => {
                (StatusCode::BAD_REQUEST, ContactReply::error(MSG_INVALID_BODY))
            }
            Outcome::Invalid(Invalid::MissingName) => {
                (StatusCode::BAD_REQUEST, ContactReply::error(MSG_NAME_REQUIRED))
            }
            Outcome::Invalid(Invalid::MissingContact) => {
                (StatusCode::BAD_REQUEST, ContactReply::error(MSG_CONTACT_REQUIRED))
            }
            Outcome::ForwardFailed(ForwardFailure::NotConfigured) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ContactReply::error(MSG_NOT_CONFIGURED),
            ),
            Outcome::ForwardFailed(ForwardFailure::Rejected(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ContactReply::error(MSG_UPSTREAM_REJECTED),
            ),
            Outcome::ForwardFailed(ForwardFailure::Unreachable) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ContactReply::error(MSG_INTERNAL),
            ),
        }
    }
}
