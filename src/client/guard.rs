//! One contact form session.
//!
//! Decides with as little evidence as possible whether a submission should
//! be sent at all, then sends a sanitized record exactly once.

use std::sync::LazyLock;
use regex::Regex;
use reqwest::StatusCode;
use thiserror::Error;

use crate::client::sanitize::sanitize;
use crate::client::transport::{Transport, TransportError};
use crate::submission::{fields, SubmissionDraft, SubmissionRecord};

/// Forms submitted faster than this are treated as automated.
pub const MIN_FILL_MS: u64 = 3000;
/// How long the success notice stays up.
pub const SUCCESS_DISPLAY_MS: u64 = 5000;

pub const MSG_NAME_REQUIRED: &str = "Palun sisesta oma nimi";
pub const MSG_CONTACT_REQUIRED: &str = "Palun sisesta telefon või email";
pub const MSG_EMAIL_INVALID: &str = "Palun sisesta korrektne email";
pub const MSG_GENERIC_FAILURE: &str =
    "Vabandust, midagi läks valesti. Palun proovi uuesti või helista meile.";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// A draft the form refuses to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormInvalid {
    #[error("{}", MSG_NAME_REQUIRED)]
    MissingName,
    #[error("{}", MSG_CONTACT_REQUIRED)]
    MissingContact,
    #[error("{}", MSG_EMAIL_INVALID)]
    BadEmail,
}

/// Check a draft the way the form does before sending.
pub fn check_draft(draft: &SubmissionDraft) -> Result<(), FormInvalid> {
    if draft.name.trim().is_empty() {
        return Err(FormInvalid::MissingName);
    }
    if draft.phone.trim().is_empty() && draft.email.trim().is_empty() {
        return Err(FormInvalid::MissingContact);
    }
    if !draft.email.is_empty() && !EMAIL.is_match(&draft.email) {
        return Err(FormInvalid::BadEmail);
    }
    Ok(())
}

/// Why nothing was sent even though the form reported success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppressed {
    Honeypot,
    TooFast { elapsed_ms: i64 },
}

/// A submission that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The edge accepted the record.
    Sent,
    /// Looked automated; success was reported and nothing left the form.
    Suppressed(Suppressed),
}

/// A submission that failed. Never retried; the visitor resubmits.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormInvalid),

    #[error("edge rejected submission with {status}: {message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// State of one form as the UI sees it.
pub struct ContactForm<T> {
    transport: T,
    source: String,
    draft: SubmissionDraft,
    load_time_ms: u64,
    error: Option<String>,
    success_until_ms: Option<u64>,
    submitting: bool,
}

impl<T: Transport> ContactForm<T> {
    /// Open a form posted from `source` (the page hostname). The load time is
    /// stamped immediately.
    pub fn new(transport: T, source: &str) -> Self {
        let mut form = Self {
            transport,
            source: source.to_string(),
            draft: SubmissionDraft::default(),
            load_time_ms: 0,
            error: None,
            success_until_ms: None,
            submitting: false,
        };
        form.stamp_load_time();
        form
    }

    /// Record now as the moment the form became interactive.
    pub fn stamp_load_time(&mut self) {
        self.stamp_load_time_at(crate::now_millis());
    }

    pub fn stamp_load_time_at(&mut self, now_ms: u64) {
        self.load_time_ms = now_ms;
    }

    pub fn load_time(&self) -> u64 {
        self.load_time_ms
    }

    /// Milliseconds until a submit at `now_ms` would pass the fill-time check.
    pub fn fill_time_remaining_at(&self, now_ms: u64) -> u64 {
        (self.load_time_ms.saturating_add(MIN_FILL_MS)).saturating_sub(now_ms)
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut SubmissionDraft {
        &mut self.draft
    }

    /// Message to show under the form, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a request is outstanding; the submit control is disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_success(&self) -> bool {
        self.is_success_at(crate::now_millis())
    }

    /// The success notice clears itself after [`SUCCESS_DISPLAY_MS`].
    pub fn is_success_at(&self, now_ms: u64) -> bool {
        self.success_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Validate the current draft, setting the visible error on failure.
    pub fn validate(&mut self) -> bool {
        match check_draft(&self.draft) {
            Ok(()) => true,
            Err(invalid) => {
                self.error = Some(invalid.to_string());
                false
            }
        }
    }

    /// Clear the draft, the error and the success notice.
    pub fn reset(&mut self) {
        self.draft.clear();
        self.error = None;
        self.success_until_ms = None;
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        self.submit_at(crate::now_millis()).await
    }

    /// Submit the draft as of `now_ms`.
    ///
    /// `&mut self` keeps a second submission from starting while this one
    /// is in flight.
    pub async fn submit_at(&mut self, now_ms: u64) -> Result<SubmitOutcome, SubmitError> {
        self.error = None;

        if let Some(reason) = self.suppression(now_ms) {
            tracing::debug!(reason = ?reason, "Submission looks automated, not sending");
            self.succeed(now_ms);
            return Ok(SubmitOutcome::Suppressed(reason));
        }

        if let Err(invalid) = check_draft(&self.draft) {
            self.error = Some(invalid.to_string());
            return Err(invalid.into());
        }

        let record = self.build_record();
        self.submitting = true;
        let sent = self.transport.send(&record).await;
        self.submitting = false;

        match sent {
            Ok(reply) if reply.is_success() => {
                self.succeed(now_ms);
                Ok(SubmitOutcome::Sent)
            }
            Ok(reply) => {
                let message = reply
                    .body
                    .as_ref()
                    .and_then(|body| body.error_message())
                    .unwrap_or(MSG_GENERIC_FAILURE)
                    .to_string();
                tracing::warn!(status = %reply.status, message = %message, "Submission rejected");
                self.error = Some(message.clone());
                Err(SubmitError::Rejected { status: reply.status, message })
            }
            Err(e) => {
                tracing::error!(error = %e, "Error submitting form");
                self.error = Some(MSG_GENERIC_FAILURE.to_string());
                Err(e.into())
            }
        }
    }

    fn suppression(&self, now_ms: u64) -> Option<Suppressed> {
        if !self.draft.honeypot.is_empty() {
            return Some(Suppressed::Honeypot);
        }
        let elapsed_ms = now_ms as i64 - self.load_time_ms as i64;
        (elapsed_ms < MIN_FILL_MS as i64).then_some(Suppressed::TooFast { elapsed_ms })
    }

    fn succeed(&mut self, now_ms: u64) {
        self.draft.clear();
        self.success_until_ms = Some(now_ms + SUCCESS_DISPLAY_MS);
    }

    /// Sanitized record of the non-empty fields plus the anti-spam signals.
    fn build_record(&self) -> SubmissionRecord {
        let d = &self.draft;
        SubmissionRecord::builder()
            .required(fields::NAME, sanitize(&d.name))
            .required(fields::SOURCE, self.source.clone())
            .text(fields::PHONE, sanitize(&d.phone))
            .text(fields::EMAIL, sanitize(&d.email.to_lowercase()))
            .text(fields::BUDGET, sanitize(&d.budget))
            .text(fields::MESSAGE, sanitize(&d.message))
            .text(fields::EVENT_TYPE, sanitize(&d.event_type))
            .text(fields::EVENT_DATE, sanitize(&d.event_date))
            .count(fields::GUESTS, d.guests)
            .count(fields::DURATION, d.duration)
            .count(fields::PIZZAS, d.pizzas)
            .count(fields::DRINKS, d.drinks)
            .flag(fields::HAS_CAKE, d.has_cake)
            .text(fields::MENU_TYPE, d.menu_type.as_deref().map(sanitize).unwrap_or_default())
            .count(fields::ESTIMATED_COST, d.estimated_cost)
            .required(fields::HONEYPOT, "")
            .millis(fields::LOAD_TIME, self.load_time_ms)
            .build()
    }
}
