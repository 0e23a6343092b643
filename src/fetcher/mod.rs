pub mod http_fetcher;
#[cfg(test)]
pub mod stub;

use async_trait::async_trait;

use crate::app::Result;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True unless the server declared a non-JSON content type.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |ct| ct.to_ascii_lowercase().contains("json"))
    }
}

/// Transport used by the gateway and the edge proxy.
///
/// Implementations return `Err` only for transport-level failures; any HTTP
/// status is reported as a [`FetchResponse`].
#[async_trait]
pub trait Fetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse>;
}
