//! Signed forwarding of contact submissions to the downstream webhook.
//!
//! One submission, one outbound POST, no retries. The caller retries from
//! the form if the forward fails.

use std::time::Duration;

use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use tracing::{error, info};

use super::signature::{is_signing_configured, sign_payload, SIGNATURE_HEADER};
use super::submission::{normalize_submission, ContactSubmission, SubmissionError, WebhookPayload};
use crate::Config;

/// Relay failures. Only validation errors are shown to the submitter verbatim.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Webhook URL or secret missing from the deployment
    #[error("contact relay is not configured: missing {0}")]
    Misconfigured(&'static str),

    /// The submission itself is invalid
    #[error(transparent)]
    Validation(#[from] SubmissionError),

    /// Signing, transport, timeout or downstream rejection
    #[error("forward failed: {0}")]
    Forward(String),
}

/// What the downstream acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub reference_id: Option<String>,
}

/// Destination and credentials for forwarded submissions.
#[derive(Debug, Clone)]
pub struct ContactRelay {
    client: Client,
    webhook_url: String,
    secret: String,
    source: String,
    timeout: Duration,
}

impl ContactRelay {
    /// Build the relay from config, failing fast when either the webhook URL
    /// or the signing secret is absent.
    pub fn from_config(client: Client, config: &Config) -> Result<Self, RelayError> {
        let webhook_url = config
            .contact_webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(RelayError::Misconfigured("CONTACT_WEBHOOK_URL"))?;

        if !is_signing_configured(&config.contact_webhook_secret) {
            return Err(RelayError::Misconfigured("CONTACT_WEBHOOK_SECRET"));
        }
        let secret = config.contact_webhook_secret.clone().unwrap_or_default();

        Ok(Self {
            client,
            webhook_url: webhook_url.to_string(),
            secret,
            source: config.contact_source.clone(),
            timeout: config.webhook_timeout(),
        })
    }

    /// Validate, normalize, sign and forward one submission.
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<Receipt, RelayError> {
        let payload = normalize_submission(submission, &self.source, Utc::now())?;
        self.forward(&payload).await
    }

    /// Sign and POST an already normalized payload.
    pub async fn forward(&self, payload: &WebhookPayload) -> Result<Receipt, RelayError> {
        let body = payload
            .canonical_bytes()
            .map_err(|e| RelayError::Forward(format!("serialize payload: {e}")))?;
        let signature = sign_payload(&self.secret, &body)
            .ok_or_else(|| RelayError::Forward("could not sign payload".to_string()))?;

        info!(
            email_domain = payload.email.split('@').nth(1).unwrap_or(""),
            has_linkedin = !payload.linkedin.is_empty(),
            body_length = body.len(),
            "contact_forward_start"
        );

        let response = self
            .client
            .post(&self.webhook_url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(timeout_ms = self.timeout.as_millis() as u64, error = %e, "contact_forward_timeout");
                } else {
                    error!(error = %e, "contact_forward_request_error");
                }
                RelayError::Forward(e.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!(
                status_code = status.as_u16(),
                response_body = %text,
                "contact_forward_rejected"
            );
            return Err(RelayError::Forward(format!("webhook returned {}", status.as_u16())));
        }

        let reference_id = extract_reference_id(&text);
        info!(
            status_code = status.as_u16(),
            reference_id = ?reference_id,
            "contact_forward_complete"
        );

        Ok(Receipt { reference_id })
    }
}

/// Pull `referenceId` out of a downstream JSON body, if there is one.
fn extract_reference_id(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("referenceId")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
