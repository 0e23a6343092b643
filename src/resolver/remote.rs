use std::sync::Arc;

use async_trait::async_trait;

use crate::app::{EncyclopediaError, Result};
use crate::domain::wiki::{MobileSectionsResponse, SummaryResponse};
use crate::domain::{EncyclopediaEntry, EncyclopediaSection, WikiSearchItem};
use crate::gateway::proxy::ProxySelector;
use crate::gateway::{encode_title, WikiGateway};
use crate::normalizer::{flatten_sections, strip_markup};
use crate::resolver::ContentSource;

/// Serves live Wikipedia content.
pub struct RemoteSource {
    gateway: Arc<WikiGateway>,
    proxy: ProxySelector,
    section_fetch: bool,
}

impl RemoteSource {
    /// `supports_cross_origin_section_fetch` is false in browsers, where the
    /// mobile-sections endpoint cannot be reached.
    pub fn new(
        gateway: Arc<WikiGateway>,
        proxy: ProxySelector,
        supports_cross_origin_section_fetch: bool,
    ) -> Self {
        Self {
            gateway,
            proxy,
            section_fetch: supports_cross_origin_section_fetch,
        }
    }

    /// Proxy first when selected, then direct. Every failed attempt is
    /// reported in the final error.
    async fn fetch_summary(&self, title: &str) -> Result<SummaryResponse> {
        let mut attempts = Vec::new();

        if self.proxy.should_use_proxy() {
            let url = self.proxy.build_proxy_url(&encode_title(title));
            tracing::debug!("Fetching summary for {} via proxy {}", title, url);
            match self.gateway.fetch_summary_from(&url).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    tracing::warn!("Proxy summary fetch failed for {}: {}", title, e);
                    attempts.push(format!("proxy: {}", e));
                }
            }
        }

        match self.gateway.fetch_summary(title).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                attempts.push(format!("direct: {}", e));
                Err(EncyclopediaError::Unresolved {
                    title: title.to_string(),
                    attempts,
                })
            }
        }
    }

    /// Optional enrichment; any failure means "no extra sections".
    async fn fetch_sections(&self, title: &str) -> Option<MobileSectionsResponse> {
        if !self.section_fetch {
            return None;
        }
        match self.gateway.fetch_mobile_sections(title).await {
            Ok(sections) => Some(sections),
            Err(e) => {
                tracing::warn!("Mobile sections unavailable for {}: {}", title, e);
                None
            }
        }
    }
}

#[async_trait]
impl ContentSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn resolve(&self, title: &str) -> Result<EncyclopediaEntry> {
        let summary = self.fetch_summary(title).await?;
        let sections = self.fetch_sections(title).await;
        Ok(assemble_entry(&summary, sections.as_ref()))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<WikiSearchItem>> {
        self.gateway.search(query, limit).await
    }
}

/// Merge a summary and optional mobile sections into one entry.
pub fn assemble_entry(
    summary: &SummaryResponse,
    mobile: Option<&MobileSectionsResponse>,
) -> EncyclopediaEntry {
    let lead_text = [
        summary.extract_html.as_deref(),
        summary.extract.as_deref(),
        mobile.and_then(|m| m.lead.lead_text()),
    ]
    .into_iter()
    .flatten()
    .map(strip_markup)
    .find(|text| !text.is_empty())
    .unwrap_or_else(|| summary.title.clone());

    let extract = summary
        .extract
        .as_deref()
        .map(strip_markup)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| lead_text.clone());

    let mut sections = vec![EncyclopediaSection::lead(&summary.title, &lead_text)];
    if let Some(mobile) = mobile {
        sections.extend(flatten_sections(mobile.remaining_nodes()));
    }

    EncyclopediaEntry {
        title: summary.title.clone(),
        description: summary
            .description
            .clone()
            .or_else(|| mobile.and_then(|m| m.lead.description.clone())),
        extract,
        image_url: summary
            .originalimage
            .as_ref()
            .map(|i| i.source.clone())
            .or_else(|| {
                mobile
                    .and_then(|m| m.lead.image.as_ref())
                    .and_then(|i| i.best_url())
                    .map(String::from)
            }),
        thumbnail_url: summary.thumbnail.as_ref().map(|i| i.source.clone()),
        sections,
        url: summary.page_url(),
    }
}
