//! Configuration module for environment variable parsing.
//!
//! Every setting has a default except the content store project and the
//! contact webhook pair, which stay `None` until the deployment provides them.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Default location of the bundled static content document.
pub const DEFAULT_STATIC_CONFIG_PATH: &str = "content/portfolio.jsonc";

/// Source identifier attached to every forwarded contact submission.
pub const DEFAULT_CONTACT_SOURCE: &str = "vaibhav.bio";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    // =========================================================================
    // Content store (Sanity)
    // =========================================================================

    /// Sanity project id; the content store is disabled when unset
    pub sanity_project_id: Option<String>,

    /// Sanity dataset name
    pub sanity_dataset: String,

    /// Sanity API version date, without the leading `v`
    pub sanity_api_version: String,

    /// Optional read token for private datasets
    pub sanity_api_token: Option<String>,

    /// Query the CDN host instead of the live API
    pub sanity_use_cdn: bool,

    /// Base URL override, used for local mocks and proxies
    pub sanity_api_host: Option<String>,

    /// Upper bound on a content store query in milliseconds
    pub content_query_timeout_ms: u64,

    /// Path of the static JSON/JSONC fallback document
    pub static_config_path: PathBuf,

    // =========================================================================
    // Contact relay
    // =========================================================================

    /// Downstream webhook receiving signed contact submissions
    pub contact_webhook_url: Option<String>,

    /// HMAC-SHA256 secret used to sign forwarded submissions
    pub contact_webhook_secret: Option<String>,

    /// `source` field stamped onto forwarded submissions
    pub contact_source: String,

    /// Upper bound on the downstream forward in milliseconds
    pub webhook_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_number("PORT", 8080),

            sanity_project_id: non_empty("SANITY_PROJECT_ID"),

            sanity_dataset: env::var("SANITY_DATASET")
                .unwrap_or_else(|_| "production".to_string()),

            sanity_api_version: env::var("SANITY_API_VERSION")
                .map(|v| v.trim_start_matches('v').to_string())
                .unwrap_or_else(|_| "2024-01-01".to_string()),

            sanity_api_token: non_empty("SANITY_API_TOKEN"),

            sanity_use_cdn: parse_bool("SANITY_USE_CDN", true),

            sanity_api_host: non_empty("SANITY_API_HOST"),

            content_query_timeout_ms: parse_number("CONTENT_QUERY_TIMEOUT_MS", 10_000),

            static_config_path: env::var("STATIC_CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_CONFIG_PATH)),

            contact_webhook_url: non_empty("CONTACT_WEBHOOK_URL"),

            contact_webhook_secret: non_empty("CONTACT_WEBHOOK_SECRET"),

            contact_source: env::var("CONTACT_SOURCE")
                .unwrap_or_else(|_| DEFAULT_CONTACT_SOURCE.to_string()),

            webhook_timeout_ms: parse_number("WEBHOOK_TIMEOUT_MS", 10_000),
        }
    }

    pub fn content_query_timeout(&self) -> Duration {
        Duration::from_millis(self.content_query_timeout_ms)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_millis(self.webhook_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            sanity_project_id: None,
            sanity_dataset: "production".to_string(),
            sanity_api_version: "2024-01-01".to_string(),
            sanity_api_token: None,
            sanity_use_cdn: true,
            sanity_api_host: None,
            content_query_timeout_ms: 10_000,
            static_config_path: PathBuf::from(DEFAULT_STATIC_CONFIG_PATH),
            contact_webhook_url: None,
            contact_webhook_secret: None,
            contact_source: DEFAULT_CONTACT_SOURCE.to_string(),
            webhook_timeout_ms: 10_000,
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_number<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Parse a boolean variable such as "true", "1", "no".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}
