//! Remote content store access.
//!
//! The resolver only needs "give me the root content document", so the store
//! sits behind a small trait. [`SanityStore`] answers it with one GROQ query
//! against the Sanity HTTP query API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use super::error::QueryError;
use crate::Config;

/// Read-only source of the root content document.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the root document. `Ok(None)` means the store has no document.
    async fn fetch_root(&self) -> Result<Option<Value>, QueryError>;
}

/// GROQ query assembling the whole portfolio in one round trip.
///
/// Case studies and maker projects use their slug (or document id) as the
/// routing `id`; image assets are dereferenced to URLs.
pub const PORTFOLIO_QUERY: &str = r#"*[_type == "portfolio"][0]{
  personal,
  seo,
  social,
  navigation,
  skills,
  "caseStudies": *[_type == "caseStudy"] | order(order asc) {
    "id": coalesce(slug.current, _id),
    title, subtitle, description,
    "image": image.asset->url,
    imageAlt, tags, duration, team, role, impact, content, comingSoon
  },
  "makerProjects": *[_type == "makerProject"] | order(order asc) {
    "id": coalesce(slug.current, _id),
    title, subtitle, description,
    "image": image.asset->url,
    tags, github, website, stats, comingSoon
  },
  "writing": *[_type == "article"] | order(publishDate desc) {
    title, subtitle, description, url, platform, publishDate, readTime, tags, comingSoon
  },
  "resources": *[_type == "resource"] {
    title, description, "downloadUrl": coalesce(file.asset->url, downloadUrl), type, size, comingSoon
  },
  "testimonials": *[_type == "testimonial"] {
    name, role, company, "image": image.asset->url, rating, text, project
  }
}"#;

/// Only published documents; drafts stay out of the site.
pub const PUBLISHED_PERSPECTIVE: &str = "published";

/// Response envelope of the query endpoint.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// Sanity connection settings.
#[derive(Debug, Clone)]
pub struct SanitySettings {
    /// API root, e.g. `https://abc123.apicdn.sanity.io`
    pub base_url: String,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl SanitySettings {
    /// Derive settings from the environment config. `None` when no project
    /// is configured and no host override is set.
    pub fn from_config(config: &Config) -> Option<Self> {
        let base_url = match (&config.sanity_api_host, &config.sanity_project_id) {
            (Some(host), _) => host.trim_end_matches('/').to_string(),
            (None, Some(project)) if config.sanity_use_cdn => {
                format!("https://{project}.apicdn.sanity.io")
            }
            (None, Some(project)) => format!("https://{project}.api.sanity.io"),
            (None, None) => return None,
        };

        Some(Self {
            base_url,
            dataset: config.sanity_dataset.clone(),
            api_version: config.sanity_api_version.clone(),
            token: config.sanity_api_token.clone(),
            timeout: config.content_query_timeout(),
        })
    }
}

/// Content store backed by the Sanity HTTP query API.
#[derive(Clone)]
pub struct SanityStore {
    client: Client,
    settings: SanitySettings,
}

impl SanityStore {
    pub fn new(client: Client, settings: SanitySettings) -> Self {
        Self { client, settings }
    }

    /// Full query URL for [`PORTFOLIO_QUERY`].
    pub fn query_url(&self) -> Result<Url, QueryError> {
        let endpoint = format!(
            "{}/v{}/data/query/{}",
            self.settings.base_url, self.settings.api_version, self.settings.dataset
        );
        Ok(Url::parse_with_params(
            &endpoint,
            &[("query", PORTFOLIO_QUERY), ("perspective", PUBLISHED_PERSPECTIVE)],
        )?)
    }
}

#[async_trait]
impl ContentStore for SanityStore {
    async fn fetch_root(&self) -> Result<Option<Value>, QueryError> {
        let url = self.query_url()?;

        info!(
            dataset = %self.settings.dataset,
            api_version = %self.settings.api_version,
            has_token = self.settings.token.is_some(),
            "content_query_start"
        );

        let mut request = self.client.get(url).timeout(self.settings.timeout);
        if let Some(token) = &self.settings.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status_code = status.as_u16(), "content_query_bad_status");
            return Err(QueryError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: QueryResponse = serde_json::from_slice(&body)?;

        info!(
            body_length = body.len(),
            has_result = !envelope.result.is_null(),
            "content_query_complete"
        );

        Ok(match envelope.result {
            Value::Null => None,
            document => Some(document),
        })
    }
}
