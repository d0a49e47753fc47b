//! In-memory search provider and page fetcher for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::{WebError, WebResult};
use super::fetch::PageFetcher;
use super::search::{SearchHit, SearchProvider};

/// Returns a fixed hit list (or a failure) and counts calls.
#[derive(Debug, Default)]
pub struct MockSearchProvider {
    hits: Vec<SearchHit>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockSearchProvider {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Convenience hit with a link and title.
    pub fn hit(link: &str, title: &str) -> SearchHit {
        SearchHit {
            link: Some(link.to_string()),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, _query: &str, num: usize) -> WebResult<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(WebError::Status {
                url: "mock://search".to_string(),
                status: 500,
            });
        }
        Ok(self.hits.iter().take(num).cloned().collect())
    }
}

/// Serves page text from a map; unknown URLs fail.
#[derive(Debug, Default)]
pub struct MockPageFetcher {
    pages: HashMap<String, String>,
    calls: Arc<AtomicUsize>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch_text(&self, url: &str) -> WebResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| WebError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
