//! Web server module.
//!
//! Routes:
//! - `GET /health`
//! - `GET /api/config`, `GET /api/config/status`
//! - `GET /api/case-studies/{id}`, `GET /api/maker-projects/{id}`
//! - `POST|OPTIONS /api/v1/contact-form/submit` (permissive CORS)

pub mod handlers;

use std::any::Any;

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::error;

pub use handlers::{
    contact_preflight, get_case_study, get_config, get_config_status, get_maker_project, health,
    method_not_allowed, submit_contact, AppState, ContactFailure, ContactResponse,
    HealthResponse,
};

/// Path of the contact relay endpoint.
pub const CONTACT_PATH: &str = "/api/v1/contact-form/submit";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let contact = Router::new()
        .route(
            CONTACT_PATH,
            post(submit_contact)
                .options(contact_preflight)
                .fallback(method_not_allowed),
        )
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    Router::new()
        .route("/health", get(health))
        .route("/api/config", get(get_config))
        .route("/api/config/status", get(get_config_status))
        .route("/api/case-studies/:id", get(get_case_study))
        .route("/api/maker-projects/:id", get(get_maker_project))
        .merge(contact)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Turn a handler panic into the generic failure body.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "handler_panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(handlers::send_failure()),
    )
        .into_response()
}
