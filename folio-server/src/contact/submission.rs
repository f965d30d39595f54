//! Contact form submissions: validation and normalization.
//!
//! The normalized [`WebhookPayload`] is what gets signed and forwarded. Its
//! field order is the serialization order, so the signed bytes are stable.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Country code assumed when the form sends none.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

const LINKEDIN_PROFILE_BASE: &str = "https://linkedin.com/in/";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Contact form body as posted by the site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Canonical payload forwarded downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub name: String,
    pub email: String,
    pub linkedin: String,
    pub phone: String,
    pub country_code: String,
    pub message: String,
    pub timestamp: String,
    pub source: String,
}

impl WebhookPayload {
    /// Compact JSON bytes, the exact input to the signature.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// A rejected submission, reported back to the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SubmissionError {
    /// Offending form field
    pub field: &'static str,
    /// Human-readable explanation shown next to the field
    pub message: String,
}

impl SubmissionError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a submission and build the payload to forward.
///
/// `source` identifies the site and `now` stamps the payload.
pub fn normalize_submission(
    submission: &ContactSubmission,
    source: &str,
    now: DateTime<Utc>,
) -> Result<WebhookPayload, SubmissionError> {
    let name = required(&submission.name, "name", "Name is required")?;
    let email = required(&submission.email, "email", "Email is required")?;
    let message = required(&submission.message, "message", "Message is required")?;

    if !is_valid_email(&email) {
        return Err(SubmissionError::new("email", "Invalid email format"));
    }

    let country_code = trimmed(&submission.country_code);

    Ok(WebhookPayload {
        name,
        email: email.to_lowercase(),
        linkedin: normalize_linkedin(submission.linkedin.as_deref().unwrap_or("")),
        phone: trimmed(&submission.phone),
        country_code: if country_code.is_empty() {
            DEFAULT_COUNTRY_CODE.to_string()
        } else {
            country_code
        },
        message,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        source: source.to_string(),
    })
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or("").to_string()
}

fn required(
    value: &Option<String>,
    field: &'static str,
    message: &str,
) -> Result<String, SubmissionError> {
    let value = trimmed(value);
    if value.is_empty() {
        return Err(SubmissionError::new(field, message));
    }
    Ok(value)
}

/// Basic `local@domain.tld` check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Turn a LinkedIn username or profile path into a profile URL.
///
/// Full `http(s)://` URLs pass through untouched and blank input stays blank.
pub fn normalize_linkedin(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }
    if input.starts_with("http://") || input.starts_with("https://") {
        return input.to_string();
    }

    let username = input.trim_start_matches('/');
    let username = username.strip_prefix("linkedin.com/in/").unwrap_or(username);
    let username = username.strip_prefix("in/").unwrap_or(username);

    format!("{LINKEDIN_PROFILE_BASE}{username}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap()
    }

    fn submission(name: &str, email: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_linkedin() {
        assert_eq!(
            normalize_linkedin("https://linkedin.com/in/janedoe"),
            "https://linkedin.com/in/janedoe"
        );
        assert_eq!(normalize_linkedin("janedoe"), "https://linkedin.com/in/janedoe");
        assert_eq!(
            normalize_linkedin("linkedin.com/in/janedoe"),
            "https://linkedin.com/in/janedoe"
        );
        assert_eq!(normalize_linkedin("//in/janedoe"), "https://linkedin.com/in/janedoe");
        assert_eq!(
            normalize_linkedin("http://www.linkedin.com/in/jane"),
            "http://www.linkedin.com/in/jane"
        );
        assert_eq!(normalize_linkedin("   "), "");
    }

    #[test]
    fn test_normalize_linkedin_is_idempotent() {
        let once = normalize_linkedin("janedoe");
        assert_eq!(normalize_linkedin(&once), once);
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+site@mail.example.co"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
    }

    #[test]
    fn test_defaults_and_lowercasing() {
        let payload = normalize_submission(
            &submission("Jane", "JANE@EXAMPLE.COM", "Hello there, this works"),
            "vaibhav.bio",
            fixed_now(),
        )
        .unwrap();

        assert_eq!(payload.email, "jane@example.com");
        assert_eq!(payload.country_code, "+91");
        assert_eq!(payload.linkedin, "");
        assert_eq!(payload.phone, "");
        assert_eq!(payload.timestamp, "2026-01-15T09:30:00.000Z");
        assert_eq!(payload.source, "vaibhav.bio");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let mut input = submission("  Jane  ", " jane@example.com ", "  Hi there  ");
        input.phone = Some(" 98765 43210 ".to_string());
        input.country_code = Some(" +1 ".to_string());
        input.linkedin = Some(" in/jane ".to_string());

        let payload = normalize_submission(&input, "vaibhav.bio", fixed_now()).unwrap();
        assert_eq!(payload.name, "Jane");
        assert_eq!(payload.email, "jane@example.com");
        assert_eq!(payload.message, "Hi there");
        assert_eq!(payload.phone, "98765 43210");
        assert_eq!(payload.country_code, "+1");
        assert_eq!(payload.linkedin, "https://linkedin.com/in/jane");
    }

    #[test]
    fn test_missing_fields_are_named() {
        let mut input = submission("Jane", "jane@example.com", "Hello");
        input.message = None;
        let err = normalize_submission(&input, "s", fixed_now()).unwrap_err();
        assert_eq!(err.field, "message");

        let err = normalize_submission(&submission("   ", "jane@example.com", "Hi"), "s", fixed_now())
            .unwrap_err();
        assert_eq!(err.field, "name");

        let err = normalize_submission(&submission("Jane", "not-an-email", "Hi"), "s", fixed_now())
            .unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Invalid email format");
    }

    #[test]
    fn test_canonical_key_order() {
        let payload = normalize_submission(
            &submission("Jane", "jane@example.com", "Hi"),
            "vaibhav.bio",
            fixed_now(),
        )
        .unwrap();

        let text = String::from_utf8(payload.canonical_bytes().unwrap()).unwrap();
        assert_eq!(
            text,
            r#"{"name":"Jane","email":"jane@example.com","linkedin":"","phone":"","countryCode":"+91","message":"Hi","timestamp":"2026-01-15T09:30:00.000Z","source":"vaibhav.bio"}"#
        );
    }
}
