use std::sync::Arc;

use async_trait::async_trait;

use crate::app::{EncyclopediaError, Result};
use crate::domain::{Article, EncyclopediaEntry, WikiSearchItem, WikiThumbnail};
use crate::normalizer::{clean_excerpt, truncate_excerpt, EXCERPT_CHARS};
use crate::resolver::ContentSource;
use crate::store::ArticleStore;

/// Serves the local dataset. Never touches the network.
pub struct LocalSource {
    store: Arc<dyn ArticleStore + Send + Sync>,
    site_base_url: String,
}

impl LocalSource {
    pub fn new(store: Arc<dyn ArticleStore + Send + Sync>, site_base_url: &str) -> Self {
        Self {
            store,
            site_base_url: site_base_url.to_string(),
        }
    }

    fn to_search_item(index: usize, article: &Article) -> WikiSearchItem {
        let excerpt = match article.display_description() {
            Some(description) => description.to_string(),
            None => truncate_excerpt(&clean_excerpt(&article.extract), EXCERPT_CHARS),
        };

        WikiSearchItem {
            id: index as u64,
            key: article.key(),
            title: article.title.clone(),
            excerpt,
            description: article.description.clone(),
            thumbnail: article
                .thumbnail_url
                .as_ref()
                .or(article.image_url.as_ref())
                .map(|url| WikiThumbnail {
                    url: url.clone(),
                    width: None,
                    height: None,
                }),
        }
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    fn name(&self) -> &'static str {
        "local"
    }

    /// Title lookup, then slug lookup for links that carry a slug.
    async fn resolve(&self, title: &str) -> Result<EncyclopediaEntry> {
        let article = self
            .store
            .find_by_title(title)
            .or_else(|_| self.store.find_by_slug(title))
            .map_err(|_| EncyclopediaError::NotFound(title.to_string()))?;

        Ok(article.to_entry(&self.site_base_url))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<WikiSearchItem>> {
        Ok(self
            .store
            .search(query)
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, article)| Self::to_search_item(index, article))
            .collect())
    }
}
