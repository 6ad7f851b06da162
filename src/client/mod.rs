//! Client submission guard.
//!
//! # Data Flow
//! ```text
//! ContactForm::new (stamps load time)
//!     → visitor edits the draft
//!     → submit: honeypot? too fast? → silent success, nothing sent
//!     → check_draft → visible error
//!     → sanitize every text field → SubmissionRecord
//!     → Transport::send (one request, no retry)
//!     → success notice for 5s, or an error message
//! ```

pub mod guard;
pub mod sanitize;
pub mod transport;

pub use guard::{check_draft, ContactForm, FormInvalid, SubmitError, SubmitOutcome, Suppressed};
pub use sanitize::sanitize;
pub use transport::{EdgeReply, HttpTransport, Transport, TransportError};
