//! Remote content gateway for the Wikipedia REST API.
//!
//! - [`WikiGateway`]: summary, mobile-sections and search lookups with
//!   response validation
//! - [`proxy::ProxySelector`]: decides when to go through the edge proxy

pub mod proxy;

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use url::Url;

use crate::app::{EncyclopediaError, Result};
use crate::config::ApiConfig;
use crate::domain::wiki::{MobileSectionsResponse, SearchResponse, SummaryResponse};
use crate::domain::WikiSearchItem;
use crate::fetcher::Fetcher;
use crate::normalizer::clean_excerpt;

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a title for use as a path segment or query value.
pub fn encode_title(title: &str) -> String {
    utf8_percent_encode(title, URI_COMPONENT).to_string()
}

pub struct WikiGateway {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    rest_base: String,
    search_base: String,
}

impl WikiGateway {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, api: &ApiConfig) -> Self {
        Self {
            fetcher,
            rest_base: api.rest_base.trim_end_matches('/').to_string(),
            search_base: api.search_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn summary_url(&self, title: &str) -> String {
        format!(
            "{}/page/summary/{}?redirect=true",
            self.rest_base,
            encode_title(title)
        )
    }

    pub fn mobile_sections_url(&self, title: &str) -> String {
        format!(
            "{}/page/mobile-sections/{}?redirect=true",
            self.rest_base,
            encode_title(title)
        )
    }

    pub fn search_url(&self, query: &str, limit: usize) -> Result<String> {
        let limit = limit.to_string();
        let url = Url::parse_with_params(
            &format!("{}/search/page", self.search_base),
            &[("q", query), ("limit", limit.as_str())],
        )?;
        Ok(url.into())
    }

    pub async fn fetch_summary(&self, title: &str) -> Result<SummaryResponse> {
        self.fetch_summary_from(&self.summary_url(title)).await
    }

    /// Summary lookup against an arbitrary URL, e.g. the edge proxy.
    pub async fn fetch_summary_from(&self, url: &str) -> Result<SummaryResponse> {
        self.get_json(url).await
    }

    pub async fn fetch_mobile_sections(&self, title: &str) -> Result<MobileSectionsResponse> {
        self.get_json(&self.mobile_sections_url(title)).await
    }

    /// Full-text search. Blank queries return nothing without a request.
    ///
    /// Excerpts come back with highlight markup and are cleaned to plain text.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<WikiSearchItem>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let response: SearchResponse = self.get_json(&self.search_url(query, limit)?).await?;

        Ok(response
            .pages
            .into_iter()
            .map(|mut item| {
                item.excerpt = clean_excerpt(&item.excerpt);
                if let Some(thumb) = item.thumbnail.as_mut() {
                    if thumb.url.starts_with("//") {
                        thumb.url = format!("https:{}", thumb.url);
                    }
                }
                item
            })
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.fetcher.get(url).await?;

        if !response.is_success() {
            return Err(EncyclopediaError::http(response.status, &response.body));
        }

        if !response.is_json() {
            return Err(EncyclopediaError::malformed(
                format!(
                    "expected JSON, got {}",
                    response.content_type.as_deref().unwrap_or("unknown content type")
                ),
                &response.body,
            ));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| EncyclopediaError::malformed(e.to_string(), &response.body))
    }
}
