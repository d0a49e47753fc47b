//! Web search providers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::constants::HTTP_TIMEOUT_SECS;

use super::error::{WebError, WebResult};

pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

/// One organic search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl SearchHit {
    /// `link`, falling back to `url`.
    pub fn target(&self) -> Option<&str> {
        self.link
            .as_deref()
            .or(self.url.as_deref())
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Option<Vec<SearchHit>>,
    #[serde(default)]
    organic_results: Option<Vec<SearchHit>>,
}

impl SerperResponse {
    fn into_hits(self) -> Vec<SearchHit> {
        self.organic
            .filter(|hits| !hits.is_empty())
            .or(self.organic_results)
            .unwrap_or_default()
    }
}

#[async_trait]
/// Source of organic results for a query.
pub trait SearchProvider: Send + Sync {
    /// Returns up to `num` results for `query`.
    async fn search(&self, query: &str, num: usize) -> WebResult<Vec<SearchHit>>;
}

/// Serper.dev Google search.
pub struct SerperSearch {
    api_key: String,
    endpoint: String,
    http: HttpClient,
}

impl std::fmt::Debug for SerperSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerperSearch")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl SerperSearch {
    pub fn new(api_key: impl Into<String>) -> WebResult<Self> {
        Self::with_endpoint(api_key, SERPER_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> WebResult<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            http,
        })
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    async fn search(&self, query: &str, num: usize) -> WebResult<Vec<SearchHit>> {
        let resp = self
            .http
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": num }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(WebError::Status {
                url: self.endpoint.clone(),
                status: resp.status().as_u16(),
            });
        }

        let body: SerperResponse = resp.json().await?;
        Ok(body.into_hits())
    }
}
