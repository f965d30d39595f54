//! Folio - content and contact services for a personal portfolio site.
//!
//! This library backs the two Folio binaries:
//! - `folio-web`: HTTP server for resolved content and the contact relay
//! - `folio-validate`: offline checker for the static content document
//!
//! ## Architecture
//!
//! ```text
//! CMS (Sanity) ─┐
//!               ├→ ConfigResolver (memoized) → /api/config, /api/case-studies/…
//! static JSONC ─┘
//!
//! contact form → ContactRelay → HMAC-signed POST → downstream webhook
//! ```

pub mod config;
pub mod contact;
pub mod content;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use contact::{ContactRelay, ContactSubmission, RelayError, WebhookPayload};
pub use content::{ConfigError, ConfigResolver, PortfolioConfig, ResolutionState};
pub use web::{router, AppState};
