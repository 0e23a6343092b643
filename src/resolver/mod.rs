//! Article resolution and search over a pluggable content source.
//!
//! ```text
//! title → ArticleResolver → ContentSource (LocalSource | RemoteSource) → EncyclopediaEntry
//! ```
//!
//! The resolver keeps no per-request state: `resolve` can simply be called
//! again to retry, and callers that fire overlapping requests are expected to
//! discard results of requests they have since superseded.

pub mod local;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::{EncyclopediaError, Result};
use crate::domain::{EncyclopediaEntry, WikiSearchItem};

pub use local::LocalSource;
pub use remote::RemoteSource;

/// Shortest trimmed query callers should submit. Not enforced here.
pub const MIN_QUERY_CHARS: usize = 2;

/// A backend able to turn titles into entries and queries into candidates.
#[async_trait]
pub trait ContentSource {
    fn name(&self) -> &'static str;

    async fn resolve(&self, title: &str) -> Result<EncyclopediaEntry>;

    /// Ranked candidates for `query`, at most `limit` of them.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<WikiSearchItem>>;
}

pub struct ArticleResolver {
    source: Arc<dyn ContentSource + Send + Sync>,
}

impl ArticleResolver {
    pub fn new(source: Arc<dyn ContentSource + Send + Sync>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Resolve an already percent-decoded title.
    pub async fn resolve(&self, title: &str) -> Result<EncyclopediaEntry> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EncyclopediaError::EmptyTitle);
        }

        tracing::debug!(source = self.source.name(), title, "Resolving article");
        match self.source.resolve(title).await {
            Ok(entry) => {
                tracing::info!(
                    source = self.source.name(),
                    title,
                    sections = entry.sections.len(),
                    "Resolved article"
                );
                Ok(entry)
            }
            Err(e) => {
                tracing::warn!(source = self.source.name(), title, "Failed to resolve: {}", e);
                Err(e)
            }
        }
    }

    /// Blank queries yield no results. Callers should hold back queries
    /// shorter than [`MIN_QUERY_CHARS`].
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<WikiSearchItem>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.source.search(query, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentConfig;
    use crate::store::MemoryStore;

    fn resolver() -> ArticleResolver {
        let config = ContentConfig::default();
        let store = Arc::new(MemoryStore::bundled(&config.categories).unwrap());
        ArticleResolver::new(Arc::new(LocalSource::new(store, &config.site_base_url)))
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let err = resolver().resolve("   ").await.unwrap_err();
        assert!(matches!(err, EncyclopediaError::EmptyTitle));
        assert!(!err.to_string().contains("local database"));
    }

    #[tokio::test]
    async fn test_resolve_trims_title() {
        let entry = resolver().resolve("  Marie Curie ").await.unwrap();
        assert_eq!(entry.title, "Marie Curie");
    }

    #[tokio::test]
    async fn test_blank_search_is_empty() {
        assert!(resolver().search(" \t ", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_is_recallable() {
        let resolver = resolver();
        let first = resolver.resolve("Quantum Mechanics").await.unwrap();
        let second = resolver.resolve("Quantum Mechanics").await.unwrap();
        assert_eq!(first.sections, second.sections);
    }
}
