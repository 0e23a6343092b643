use std::sync::Arc;

use crate::app::error::Result;
use crate::config::{Config, ContentConfig, SourceMode};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::gateway::proxy::ProxySelector;
use crate::gateway::WikiGateway;
use crate::resolver::{ArticleResolver, ContentSource, LocalSource, RemoteSource};
use crate::store::MemoryStore;

/// Long-lived components, built once at startup and shared by every request.
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub store: Arc<MemoryStore>,
    pub resolver: ArticleResolver,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(
            &config.api.user_agent,
            config.api.timeout(),
        )?);
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let store = Arc::new(Self::load_store(&config.content)?);

        let source: Arc<dyn ContentSource + Send + Sync> = match config.content.mode {
            SourceMode::Local => Arc::new(LocalSource::new(
                store.clone(),
                &config.content.site_base_url,
            )),
            SourceMode::Remote => {
                let gateway = Arc::new(WikiGateway::new(fetcher.clone(), &config.api));
                Arc::new(RemoteSource::new(
                    gateway,
                    ProxySelector::new(&config.platform, &config.api),
                    config.platform.supports_cross_origin_section_fetch(),
                ))
            }
        };
        let resolver = ArticleResolver::new(source);

        Ok(Self {
            config,
            fetcher,
            store,
            resolver,
        })
    }

    fn load_store(content: &ContentConfig) -> Result<MemoryStore> {
        match &content.dataset {
            Some(path) => MemoryStore::from_path(path, &content.categories),
            None => MemoryStore::bundled(&content.categories),
        }
    }
}
