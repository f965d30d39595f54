//! Contact form relay.
//!
//! Submissions are validated, normalized into a canonical payload, signed
//! with HMAC-SHA256 and forwarded to the configured webhook:
//!
//! ```text
//! form JSON → normalize_submission() → WebhookPayload → sign → POST downstream
//! ```

pub mod relay;
pub mod signature;
pub mod submission;

pub use relay::{ContactRelay, Receipt, RelayError};
pub use signature::{sign_payload, SIGNATURE_HEADER};
pub use submission::{
    normalize_linkedin, normalize_submission, ContactSubmission, SubmissionError, WebhookPayload,
};
