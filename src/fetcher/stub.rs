//! Canned transport for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::{EncyclopediaError, Result};
use crate::fetcher::{FetchResponse, Fetcher};

enum Canned {
    Response(FetchResponse),
    Unreachable(String),
}

#[derive(Default)]
pub struct StubFetcher {
    routes: HashMap<String, Canned>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(self, url: &str, status: u16, body: &str) -> Self {
        self.respond(url, status, Some("application/json; charset=utf-8"), body)
    }

    pub fn respond(mut self, url: &str, status: u16, content_type: Option<&str>, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Canned::Response(FetchResponse {
                status,
                content_type: content_type.map(String::from),
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn unreachable(mut self, url: &str, reason: &str) -> Self {
        self.routes
            .insert(url.to_string(), Canned::Unreachable(reason.to_string()));
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.routes.get(url) {
            Some(Canned::Response(response)) => Ok(response.clone()),
            Some(Canned::Unreachable(reason)) => Err(EncyclopediaError::Network(reason.clone())),
            None => Err(EncyclopediaError::Network(format!("connection refused: {}", url))),
        }
    }
}
