//! Page download and visible-text extraction.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use tracing::debug;

use crate::constants::{HTTP_TIMEOUT_SECS, MAX_PAGE_BYTES};

use super::error::{WebError, WebResult};

const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "head", "nav", "footer", "form", "template",
];

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "main", "aside", "header", "blockquote", "pre", "li", "ul",
    "ol", "dl", "dt", "dd", "table", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6",
    "figcaption", "br", "hr",
];

#[async_trait]
/// Retrieves the readable text of a page.
pub trait PageFetcher: Send + Sync {
    /// Returns visible text with paragraphs separated by blank lines.
    async fn fetch_text(&self, url: &str) -> WebResult<String>;
}

/// reqwest + scraper implementation.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    http: HttpClient,
}

impl HttpPageFetcher {
    pub fn new() -> WebResult<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(concat!("copyless/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> WebResult<String> {
        let mut resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(WebError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if !append_capped(&mut body, &chunk, MAX_PAGE_BYTES) {
                debug!(url, limit = MAX_PAGE_BYTES, "Page body truncated");
                break;
            }
        }

        let html = String::from_utf8_lossy(&body).into_owned();
        tokio::task::spawn_blocking(move || extract_text(&html))
            .await
            .map_err(|e| WebError::Extract {
                reason: format!("extraction task failed: {e}"),
            })
    }
}

/// Appends up to `limit - body.len()` bytes of `chunk`. Returns `false` once full.
pub fn append_capped(body: &mut Vec<u8>, chunk: &[u8], limit: usize) -> bool {
    let room = limit.saturating_sub(body.len());
    if chunk.len() >= room {
        body.extend_from_slice(&chunk[..room]);
        return false;
    }
    body.extend_from_slice(chunk);
    true
}

enum Step<'a> {
    Open(ElementRef<'a>),
    Text(&'a str),
    Close,
}

/// Extracts visible text from HTML, one paragraph per block element.
///
/// Script, style and navigation chrome are dropped. Whitespace inside a
/// paragraph collapses to single spaces; paragraphs are joined with `"\n\n"`.
/// The walk uses an explicit stack, so nesting depth is bounded by the heap.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut stack = vec![Step::Open(document.root_element())];

    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => {
                for word in text.split_whitespace() {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                }
            }
            Step::Close => flush(&mut current, &mut paragraphs),
            Step::Open(element) => {
                let name = element.value().name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if BLOCK_ELEMENTS.contains(&name) {
                    flush(&mut current, &mut paragraphs);
                    stack.push(Step::Close);
                }

                let children: Vec<Step<'_>> = element
                    .children()
                    .filter_map(|child| match child.value() {
                        Node::Text(text) => Some(Step::Text(&**text)),
                        Node::Element(_) => ElementRef::wrap(child).map(Step::Open),
                        _ => None,
                    })
                    .collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }
    flush(&mut current, &mut paragraphs);

    paragraphs.join("\n\n")
}

fn flush(current: &mut String, paragraphs: &mut Vec<String>) {
    let text = current.trim();
    if !text.is_empty() {
        paragraphs.push(text.to_string());
    }
    current.clear();
}

/// Blank-line separated, trimmed, non-empty chunks; at most `limit`.
pub fn split_paragraphs(text: &str, limit: usize) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}
