//! Submission data shared by the client guard and the edge service.
//!
//! # Data Flow
//! ```text
//! SubmissionDraft (mutable, owned by one form session)
//!     → client guard sanitizes non-empty fields
//!     → SubmissionRecord (immutable JSON object, dropped after send)
//!     → edge service strips the internal fields
//!     → webhook
//! ```
//!
//! Validation is deliberately not shared here: the client and the edge each
//! run their own checks because the edge cannot trust the client.

pub mod draft;
pub mod fields;
pub mod record;
pub mod reply;

pub use draft::SubmissionDraft;
pub use record::SubmissionRecord;
pub use reply::ContactReply;
