//! HTTP endpoint handlers.
//!
//! The contact handler never lets internal detail reach the response body:
//! validation messages are shown verbatim, everything else becomes a generic
//! 500 and is logged here instead.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::contact::{ContactRelay, ContactSubmission, RelayError, SubmissionError};
use crate::content::{
    ConfigError, ConfigResolver, ContentStore, ResolutionState, SanitySettings, SanityStore,
    StaticDocument,
};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<ConfigResolver>,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config, resolver: ConfigResolver, http: Client) -> Self {
        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            http,
        }
    }

    /// Wire the resolver and HTTP client from environment config.
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().build()?;

        let store = SanitySettings::from_config(&config)
            .map(|settings| Arc::new(SanityStore::new(http.clone(), settings)) as Arc<dyn ContentStore>);

        let resolver = ConfigResolver::new(
            store,
            StaticDocument::new(config.static_config_path.clone()),
            config.content_query_timeout(),
        );

        Ok(Self::new(config, resolver, http))
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Content
// =============================================================================

/// Body returned when content cannot be resolved.
#[derive(Debug, Serialize)]
pub struct ConfigErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        let body = ConfigErrorBody {
            error: "Configuration error",
            field: self.field().map(str::to_string),
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Resolution state, without waiting for an in-flight resolution.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ConfigErrorBody>,
}

/// Resolved portfolio content.
pub async fn get_config(State(state): State<AppState>) -> Response {
    match state.resolver.resolve().await {
        Ok(config) => Json(config).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Current resolution state: loading, error or ready.
pub async fn get_config_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let current = state.resolver.state().await;
    let error = match &current {
        ResolutionState::Failed(e) => Some(ConfigErrorBody {
            error: "Configuration error",
            field: e.field().map(str::to_string),
            message: e.to_string(),
        }),
        _ => None,
    };

    Json(StatusResponse {
        state: current.label(),
        error,
    })
}

fn not_found(kind: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("{kind} {id} not found") })),
    )
        .into_response()
}

/// Single case study by routing id.
pub async fn get_case_study(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let config = match state.resolver.resolve().await {
        Ok(config) => config,
        Err(e) => return e.into_response(),
    };

    match config.case_study(&id) {
        Some(study) => Json(study).into_response(),
        None => not_found("Case study", &id),
    }
}

/// Single maker project by routing id.
pub async fn get_maker_project(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let config = match state.resolver.resolve().await {
        Ok(config) => config,
        Err(e) => return e.into_response(),
    };

    match config.maker_project(&id) {
        Some(project) => Json(project).into_response(),
        None => not_found("Maker project", &id),
    }
}

// =============================================================================
// Contact Form
// =============================================================================

/// Successful relay response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
    pub reference_id: Option<String>,
}

/// Failed relay response.
#[derive(Debug, Serialize)]
pub struct ContactFailure {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

impl ContactFailure {
    fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error,
            message: message.into(),
        }
    }
}

/// Generic 500 body, also used for panics caught by the router.
pub fn send_failure() -> ContactFailure {
    ContactFailure::new(
        "Failed to send message",
        "Please try again or reach out via social media",
    )
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RelayError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ContactFailure::new("Validation failed", e.message),
            ),
            RelayError::Misconfigured(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ContactFailure::new(
                    "Server configuration error",
                    "The contact form is unavailable right now. Please reach out via social media",
                ),
            ),
            RelayError::Forward(_) => (StatusCode::INTERNAL_SERVER_ERROR, send_failure()),
        };
        (status, Json(body)).into_response()
    }
}

/// Contact form endpoint.
///
/// This endpoint:
/// 1. Checks the relay is configured (before reading the body)
/// 2. Validates and normalizes the submission
/// 3. Signs and forwards it downstream
/// 4. Returns the downstream reference id
pub async fn submit_contact(State(state): State<AppState>, body: Bytes) -> Response {
    let relay = match ContactRelay::from_config(state.http.clone(), &state.config) {
        Ok(relay) => relay,
        Err(e) => {
            error!(error = %e, "contact_relay_misconfigured");
            return e.into_response();
        }
    };

    let submission: ContactSubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            warn!(error = %e, body_length = body.len(), "contact_body_invalid");
            return RelayError::Validation(SubmissionError::new(
                "body",
                "Request body must be a JSON object with string fields",
            ))
            .into_response();
        }
    };

    info!(
        has_linkedin = submission.linkedin.is_some(),
        has_phone = submission.phone.is_some(),
        "contact_submission_received"
    );

    match relay.submit(&submission).await {
        Ok(receipt) => {
            info!(reference_id = ?receipt.reference_id, "contact_submission_forwarded");
            (
                StatusCode::OK,
                Json(ContactResponse {
                    success: true,
                    message: "Message sent successfully! Check your email for confirmation.",
                    reference_id: receipt.reference_id,
                }),
            )
                .into_response()
        }
        Err(e) => {
            match &e {
                RelayError::Validation(v) => {
                    warn!(field = v.field, reason = %v.message, "contact_submission_invalid")
                }
                other => error!(error = %other, "contact_submission_failed"),
            }
            e.into_response()
        }
    }
}

/// CORS preflight: 200 with an empty body.
pub async fn contact_preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on the contact endpoint.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
