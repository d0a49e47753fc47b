//! Live web comparison.
//!
//! Searches the web for the submitted text, downloads each organic result, and
//! reports the page paragraph closest to the text by cosine similarity. Search
//! results and page text are cached with TTLs so repeated checks do not hammer
//! the search API or remote sites.
//!
//! Every failure (missing API key, search error, unreachable page) degrades to
//! fewer results and a `warn!` line; [`WebComparer::compare`] itself never fails.

pub mod error;
pub mod fetch;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod search;

#[cfg(test)]
mod tests;

pub use error::{WebError, WebResult};
pub use fetch::{HttpPageFetcher, PageFetcher, extract_text, split_paragraphs};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockPageFetcher, MockSearchProvider};
pub use search::{SearchHit, SearchProvider, SerperSearch};

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::{
    DEFAULT_MAX_CHUNKS_PER_PAGE, DEFAULT_MAX_SEARCH_RESULTS, PAGE_CACHE_CAPACITY,
    PAGE_CACHE_TTL_SECS, SEARCH_CACHE_CAPACITY, SEARCH_CACHE_TTL_SECS, SNIPPET_MAX_CHARS,
    SNIPPET_TRUNCATE_CHARS, round_to,
};
use crate::embedding::{SentenceEmbedder, cosine_similarity};

/// Best-matching paragraph of one web page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebMatch {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Cosine similarity, four decimals.
    pub score: f64,
}

/// Shortens `text` to 247 characters plus `"..."` when it exceeds 250.
pub fn truncate_snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_MAX_CHARS {
        let mut snippet: String = text.chars().take(SNIPPET_TRUNCATE_CHARS).collect();
        snippet.push_str("...");
        snippet
    } else {
        text.to_string()
    }
}

/// A fetched page ready for scoring.
struct PageChunks {
    url: String,
    title: String,
    chunks: Vec<String>,
}

pub struct WebComparer {
    search: Option<Arc<dyn SearchProvider>>,
    fetcher: Arc<dyn PageFetcher>,
    embedder: Arc<SentenceEmbedder>,
    search_cache: Cache<String, Arc<Vec<SearchHit>>>,
    page_cache: Cache<String, Arc<str>>,
    max_search_results: usize,
    max_chunks_per_page: usize,
}

impl std::fmt::Debug for WebComparer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebComparer")
            .field("enabled", &self.is_enabled())
            .field("max_search_results", &self.max_search_results)
            .field("max_chunks_per_page", &self.max_chunks_per_page)
            .finish()
    }
}

impl WebComparer {
    /// Comparer backed by `search` (or disabled when `None`) and `fetcher`.
    pub fn new(
        search: Option<Arc<dyn SearchProvider>>,
        fetcher: Arc<dyn PageFetcher>,
        embedder: Arc<SentenceEmbedder>,
    ) -> Self {
        Self {
            search,
            fetcher,
            embedder,
            search_cache: Cache::builder()
                .max_capacity(SEARCH_CACHE_CAPACITY)
                .time_to_live(Duration::from_secs(SEARCH_CACHE_TTL_SECS))
                .build(),
            page_cache: Cache::builder()
                .max_capacity(PAGE_CACHE_CAPACITY)
                .time_to_live(Duration::from_secs(PAGE_CACHE_TTL_SECS))
                .build(),
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            max_chunks_per_page: DEFAULT_MAX_CHUNKS_PER_PAGE,
        }
    }

    /// Serper + HTTP comparer from server configuration.
    pub fn from_config(config: &Config, embedder: Arc<SentenceEmbedder>) -> WebResult<Self> {
        let search: Option<Arc<dyn SearchProvider>> = match config.serper_api_key.as_deref() {
            Some(key) => Some(Arc::new(SerperSearch::new(key)?)),
            None => None,
        };

        info!(
            search_enabled = search.is_some(),
            max_search_results = config.max_search_results,
            max_chunks_per_page = config.max_chunks_per_page,
            "Web comparison configured"
        );

        Ok(Self::new(search, Arc::new(HttpPageFetcher::new()?), embedder)
            .with_limits(config.max_search_results, config.max_chunks_per_page))
    }

    pub fn with_limits(mut self, max_search_results: usize, max_chunks_per_page: usize) -> Self {
        self.max_search_results = max_search_results;
        self.max_chunks_per_page = max_chunks_per_page;
        self
    }

    /// `false` when no search provider is configured.
    pub fn is_enabled(&self) -> bool {
        self.search.is_some()
    }

    /// Top `top_k` pages by best-paragraph similarity to `text`.
    pub async fn compare(&self, text: &str, top_k: usize) -> Vec<WebMatch> {
        let hits = self.search_hits(text).await;
        if hits.is_empty() {
            return Vec::new();
        }

        let pages = join_all(
            hits.iter()
                .filter_map(|hit| hit.target().map(|url| (url, hit)))
                .map(|(url, hit)| self.page_chunks(url, hit)),
        )
        .await
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

        if pages.is_empty() {
            return Vec::new();
        }

        let mut matches = match self.score_pages(text, pages).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "Web comparison scoring failed");
                return Vec::new();
            }
        };

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        matches.truncate(top_k);

        debug!(results = matches.len(), "Web comparison complete");
        matches
    }

    async fn search_hits(&self, query: &str) -> Arc<Vec<SearchHit>> {
        let Some(search) = &self.search else {
            debug!("No search API key configured; skipping web comparison");
            return Arc::new(Vec::new());
        };

        if let Some(hits) = self.search_cache.get(query) {
            debug!("Search cache hit");
            return hits;
        }

        match search.search(query, self.max_search_results).await {
            Ok(hits) => {
                let hits = Arc::new(hits);
                self.search_cache.insert(query.to_string(), hits.clone());
                hits
            }
            Err(e) => {
                warn!(error = %e, "Web search failed");
                Arc::new(Vec::new())
            }
        }
    }

    async fn page_text(&self, url: &str) -> Option<Arc<str>> {
        if let Some(text) = self.page_cache.get(url) {
            return Some(text);
        }

        match self.fetcher.fetch_text(url).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                let text: Arc<str> = Arc::from(text);
                self.page_cache.insert(url.to_string(), text.clone());
                Some(text)
            }
            Err(e) => {
                warn!(url, error = %e, "Page fetch failed");
                None
            }
        }
    }

    async fn page_chunks(&self, url: &str, hit: &SearchHit) -> Option<PageChunks> {
        let text = self.page_text(url).await?;
        let chunks = split_paragraphs(&text, self.max_chunks_per_page);
        if chunks.is_empty() {
            return None;
        }
        Some(PageChunks {
            url: url.to_string(),
            title: hit.title.clone().unwrap_or_default(),
            chunks,
        })
    }

    /// Embeds the query and every chunk on the blocking pool, then scores.
    async fn score_pages(&self, text: &str, pages: Vec<PageChunks>) -> WebResult<Vec<WebMatch>> {
        let embedder = self.embedder.clone();
        let query = text.to_string();

        tokio::task::spawn_blocking(move || -> WebResult<Vec<WebMatch>> {
            let query_vec = embedder.embed(&query).map_err(|e| WebError::Embedding {
                reason: e.to_string(),
            })?;

            let mut matches = Vec::with_capacity(pages.len());
            for page in pages {
                let vectors = embedder
                    .embed_batch(&page.chunks)
                    .map_err(|e| WebError::Embedding {
                        reason: e.to_string(),
                    })?;

                let best = vectors
                    .iter()
                    .map(|v| cosine_similarity(&query_vec, v))
                    .enumerate()
                    .fold(None, |best: Option<(usize, f32)>, (i, score)| match best {
                        Some((_, top)) if top >= score => best,
                        _ => Some((i, score)),
                    });

                if let Some((index, score)) = best {
                    matches.push(WebMatch {
                        url: page.url,
                        title: page.title,
                        snippet: truncate_snippet(&page.chunks[index]),
                        score: round_to(f64::from(score), 4),
                    });
                }
            }
            Ok(matches)
        })
        .await
        .map_err(|e| WebError::Embedding {
            reason: format!("embedding task failed: {e}"),
        })?
    }
}
