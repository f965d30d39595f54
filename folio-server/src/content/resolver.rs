//! Content resolution with fallback and single-flight memoization.
//!
//! ## Fallback chain
//!
//! ```text
//! content store (bounded) ──ok──→ normalize ─┐
//!        │ error / timeout / empty           ├─→ validate + decode → cache
//!        └──────────→ static document ───────┘
//! ```
//!
//! Store failures are logged and recovered. Static document and validation
//! failures are terminal and cached like a success.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{OnceCell, RwLock};
use tracing::{error, info, warn};

use super::document::{decode, is_empty_document, normalize_store_document};
use super::error::{ConfigError, Origin, QueryError};
use super::fallback::StaticDocument;
use super::model::PortfolioConfig;
use super::store::ContentStore;

/// Outcome of one resolution, shared by every caller.
pub type Resolution = Result<Arc<PortfolioConfig>, ConfigError>;

/// What a consumer should render right now.
#[derive(Debug, Clone)]
pub enum ResolutionState {
    Loading,
    Failed(ConfigError),
    Ready(Arc<PortfolioConfig>),
}

impl ResolutionState {
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionState::Loading => "loading",
            ResolutionState::Failed(_) => "error",
            ResolutionState::Ready(_) => "ready",
        }
    }
}

/// Session-scoped resolver. Each instance resolves at most once until reset.
pub struct ConfigResolver {
    store: Option<Arc<dyn ContentStore>>,
    fallback: StaticDocument,
    query_timeout: Duration,
    slot: RwLock<Arc<OnceCell<Resolution>>>,
}

impl ConfigResolver {
    pub fn new(
        store: Option<Arc<dyn ContentStore>>,
        fallback: StaticDocument,
        query_timeout: Duration,
    ) -> Self {
        Self {
            store,
            fallback,
            query_timeout,
            slot: RwLock::new(Arc::new(OnceCell::new())),
        }
    }

    /// Resolve the portfolio content, memoized per instance.
    ///
    /// Concurrent callers during a cold resolution wait on the same attempt,
    /// so the content store is queried at most once.
    pub async fn resolve(&self) -> Resolution {
        let cell = self.slot.read().await.clone();
        cell.get_or_init(|| self.resolve_uncached()).await.clone()
    }

    /// Current state without triggering or waiting on a resolution.
    pub async fn state(&self) -> ResolutionState {
        let cell = self.slot.read().await.clone();
        match cell.get() {
            None => ResolutionState::Loading,
            Some(Ok(config)) => ResolutionState::Ready(config.clone()),
            Some(Err(e)) => ResolutionState::Failed(e.clone()),
        }
    }

    /// Forget the cached value or error. The next `resolve` starts over.
    pub async fn reset(&self) {
        *self.slot.write().await = Arc::new(OnceCell::new());
        info!("config_resolver_reset");
    }

    async fn resolve_uncached(&self) -> Resolution {
        info!(
            store_configured = self.store.is_some(),
            fallback_path = %self.fallback.path().display(),
            "config_resolve_start"
        );

        let outcome = match self.query_store().await {
            Some(raw) => decode(normalize_store_document(raw), Origin::ContentStore),
            None => match self.fallback.load().await {
                Ok(raw) => decode(raw, Origin::StaticDocument),
                Err(e) => Err(e),
            },
        };

        match &outcome {
            Ok(config) => info!(
                name = %config.personal.name,
                case_studies = config.case_studies.len(),
                maker_projects = config.maker_projects.len(),
                writing = config.writing.len(),
                resources = config.resources.len(),
                "config_resolve_complete"
            ),
            Err(e) => error!(error = %e, field = ?e.field(), "config_resolve_failed"),
        }

        outcome.map(Arc::new)
    }

    /// Query the store, turning every failure into `None`.
    async fn query_store(&self) -> Option<Value> {
        let store = match &self.store {
            Some(store) => store,
            None => {
                info!("content_store_not_configured");
                return None;
            }
        };

        let result = match tokio::time::timeout(self.query_timeout, store.fetch_root()).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Timeout(self.query_timeout.as_millis())),
        };

        match result {
            Ok(Some(doc)) if !is_empty_document(&doc) => Some(doc),
            Ok(_) => {
                warn!("content_store_empty_falling_back");
                None
            }
            Err(e) => {
                warn!(error = %e, "content_query_failed_falling_back");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store double that counts queries and replays a canned answer.
    struct MockStore {
        calls: AtomicUsize,
        delay: Duration,
        answer: fn() -> Result<Option<Value>, QueryError>,
    }

    impl MockStore {
        fn new(answer: fn() -> Result<Option<Value>, QueryError>) -> Arc<Self> {
            Self::slow(answer, Duration::ZERO)
        }

        fn slow(answer: fn() -> Result<Option<Value>, QueryError>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
                answer,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentStore for MockStore {
        async fn fetch_root(&self) -> Result<Option<Value>, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            (self.answer)()
        }
    }

    fn cms_document() -> Result<Option<Value>, QueryError> {
        Ok(Some(json!({
            "personal": {"name": "Vaibhav (CMS)"},
            "caseStudies": [{"id": "checkout", "title": "Checkout"}]
        })))
    }

    fn cms_unreachable() -> Result<Option<Value>, QueryError> {
        Err(QueryError::Status { status: 503 })
    }

    fn cms_empty() -> Result<Option<Value>, QueryError> {
        Ok(Some(json!({})))
    }

    fn cms_without_name() -> Result<Option<Value>, QueryError> {
        Ok(Some(json!({"personal": {"title": "PM"}})))
    }

    fn static_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const STATIC_DOC: &str = r#"{
        // bundled fallback
        "personal": {"name": "Vaibhav (static)"},
        "caseStudies": [],
        "makerProjects": [],
        "writing": [],
        "resources": [],
    }"#;

    fn resolver(store: Option<Arc<MockStore>>, path: &std::path::Path) -> ConfigResolver {
        let store = store.map(|s| s as Arc<dyn ContentStore>);
        ConfigResolver::new(store, StaticDocument::new(path), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_store_document_wins() {
        let file = static_file(STATIC_DOC);
        let store = MockStore::new(cms_document);
        let resolver = resolver(Some(store.clone()), file.path());

        let config = resolver.resolve().await.unwrap();
        assert_eq!(config.personal.name, "Vaibhav (CMS)");
        assert!(config.writing.is_empty());
        assert_eq!(config.case_study("checkout").unwrap().release.title(), "Checkout");
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_store_falls_back_to_static() {
        let file = static_file(STATIC_DOC);
        let resolver = resolver(Some(MockStore::new(cms_unreachable)), file.path());

        let config = resolver.resolve().await.unwrap();
        assert_eq!(config.personal.name, "Vaibhav (static)");
        assert!(config.case_studies.is_empty());
        assert!(config.maker_projects.is_empty());
        assert!(config.writing.is_empty());
        assert!(config.resources.is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_document_falls_back() {
        let file = static_file(STATIC_DOC);
        let resolver = resolver(Some(MockStore::new(cms_empty)), file.path());

        let config = resolver.resolve().await.unwrap();
        assert_eq!(config.personal.name, "Vaibhav (static)");
    }

    #[tokio::test]
    async fn test_slow_store_times_out_and_falls_back() {
        let file = static_file(STATIC_DOC);
        let store = MockStore::slow(cms_document, Duration::from_secs(5));
        let resolver = resolver(Some(store), file.path());

        let config = resolver.resolve().await.unwrap();
        assert_eq!(config.personal.name, "Vaibhav (static)");
    }

    #[tokio::test]
    async fn test_no_store_uses_static() {
        let file = static_file(STATIC_DOC);
        let config = resolver(None, file.path()).resolve().await.unwrap();
        assert_eq!(config.personal.name, "Vaibhav (static)");
    }

    #[tokio::test]
    async fn test_missing_name_from_store_is_surfaced() {
        let file = static_file(STATIC_DOC);
        let resolver = resolver(Some(MockStore::new(cms_without_name)), file.path());

        let err = resolver.resolve().await.unwrap_err();
        assert_eq!(err.field(), Some("personal.name"));
    }

    #[tokio::test]
    async fn test_missing_name_from_static_is_surfaced() {
        let file = static_file(r#"{"personal": {}, "caseStudies": [], "makerProjects": [], "writing": [], "resources": []}"#);
        let resolver = resolver(Some(MockStore::new(cms_unreachable)), file.path());

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationFailed { origin: Origin::StaticDocument, ref field, .. } if field == "personal.name"
        ));
    }

    #[tokio::test]
    async fn test_malformed_static_is_fatal() {
        let file = static_file("{ not json");
        let resolver = resolver(Some(MockStore::new(cms_unreachable)), file.path());

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { origin: Origin::StaticDocument, .. }));
    }

    #[tokio::test]
    async fn test_resolve_is_memoized() {
        let file = static_file(STATIC_DOC);
        let store = MockStore::new(cms_document);
        let resolver = resolver(Some(store.clone()), file.path());

        let first = resolver.resolve().await.unwrap();
        let second = resolver.resolve().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_terminal_error_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let store = MockStore::new(cms_unreachable);
        let resolver = resolver(Some(store.clone()), &dir.path().join("missing.jsonc"));

        let first = resolver.resolve().await.unwrap_err();
        let second = resolver.resolve().await.unwrap_err();

        assert!(matches!(first, ConfigError::Unavailable(_)));
        assert_eq!(first, second);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_query() {
        let file = static_file(STATIC_DOC);
        let store = MockStore::slow(cms_document, Duration::from_millis(50));
        let resolver = resolver(Some(store.clone()), file.path());

        let results =
            futures::future::join_all((0..8).map(|_| resolver.resolve())).await;

        assert_eq!(store.calls(), 1);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
        }
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_poison_resolution() {
        let file = static_file(STATIC_DOC);
        let store = MockStore::slow(cms_document, Duration::from_millis(100));
        let resolver = resolver(Some(store.clone()), file.path());

        let abandoned = tokio::time::timeout(Duration::from_millis(20), resolver.resolve()).await;
        assert!(abandoned.is_err());
        assert!(matches!(resolver.state().await, ResolutionState::Loading));

        let config = resolver.resolve().await.unwrap();
        assert_eq!(config.personal.name, "Vaibhav (CMS)");
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_state_transitions_and_reset() {
        let file = static_file(STATIC_DOC);
        let store = MockStore::new(cms_document);
        let resolver = resolver(Some(store.clone()), file.path());

        assert!(matches!(resolver.state().await, ResolutionState::Loading));
        resolver.resolve().await.unwrap();
        assert_eq!(resolver.state().await.label(), "ready");

        resolver.reset().await;
        assert!(matches!(resolver.state().await, ResolutionState::Loading));

        resolver.resolve().await.unwrap();
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_state_carries_error() {
        let file = static_file("[]");
        let resolver = resolver(None, file.path());

        resolver.resolve().await.unwrap_err();
        match resolver.state().await {
            ResolutionState::Failed(err) => assert_eq!(err.field(), Some("$")),
            other => panic!("unexpected state: {}", other.label()),
        }
    }
}
