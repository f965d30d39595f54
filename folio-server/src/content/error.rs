//! Error types for content resolution.

use std::fmt;

use serde::Serialize;

/// Where a content document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    ContentStore,
    StaticDocument,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::ContentStore => f.write_str("content store"),
            Origin::StaticDocument => f.write_str("static document"),
        }
    }
}

/// A single shape problem, addressed by its dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Fatal content resolution errors, surfaced to consumers.
///
/// Cloneable so a terminal failure can be cached and handed to every caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// No usable document from either source
    #[error("content unavailable: {0}")]
    Unavailable(String),

    /// The document could not be parsed or has mistyped fields
    #[error("{origin} is malformed: {message}")]
    Malformed { origin: Origin, message: String },

    /// A required field or collection is missing or invalid
    #[error("{origin} failed validation at `{field}`: {reason}")]
    ValidationFailed {
        origin: Origin,
        field: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn validation(origin: Origin, violation: Violation) -> Self {
        ConfigError::ValidationFailed {
            origin,
            field: violation.field,
            reason: violation.reason,
        }
    }

    /// The offending field path, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::ValidationFailed { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Content store query failures. Always recovered by falling back.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content store returned status {status}")]
    Status { status: u16 },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid query url: {0}")]
    Url(#[from] url::ParseError),

    #[error("query timed out after {0} ms")]
    Timeout(u128),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = ConfigError::validation(
            Origin::StaticDocument,
            Violation::new("personal.name", "must be a non-empty string"),
        );

        assert_eq!(err.field(), Some("personal.name"));
        assert_eq!(
            err.to_string(),
            "static document failed validation at `personal.name`: must be a non-empty string"
        );
    }
}
