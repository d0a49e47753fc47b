use super::*;

const QUERY: &str = "The mitochondria is the powerhouse of the cell";

fn embedder() -> Arc<SentenceEmbedder> {
    Arc::new(SentenceEmbedder::stub())
}

fn comparer(
    search: Arc<MockSearchProvider>,
    fetcher: Arc<MockPageFetcher>,
) -> WebComparer {
    WebComparer::new(Some(search), fetcher, embedder())
}

fn two_pages() -> (Arc<MockSearchProvider>, Arc<MockPageFetcher>) {
    let search = Arc::new(MockSearchProvider::new(vec![
        MockSearchProvider::hit("https://unrelated.example", "Unrelated"),
        MockSearchProvider::hit("https://biology.example", "Biology"),
    ]));
    let fetcher = Arc::new(
        MockPageFetcher::new()
            .with_page("https://unrelated.example", "Stocks rallied.\n\nBonds fell.")
            .with_page(
                "https://biology.example",
                &format!("Cells are small.\n\n{QUERY}\n\nDNA stores information."),
            ),
    );
    (search, fetcher)
}

#[test]
fn test_truncate_snippet() {
    let short = "a".repeat(250);
    assert_eq!(truncate_snippet(&short), short);

    let long = "b".repeat(251);
    let snippet = truncate_snippet(&long);
    assert_eq!(snippet.chars().count(), 250);
    assert!(snippet.ends_with("..."));
    assert_eq!(&snippet[..247], &long[..247]);
}

#[test]
fn test_truncate_snippet_counts_chars_not_bytes() {
    let text = "é".repeat(260);
    let snippet = truncate_snippet(&text);
    assert_eq!(snippet.chars().count(), 250);
}

#[tokio::test]
async fn test_disabled_without_search_provider() {
    let comparer = WebComparer::new(None, Arc::new(MockPageFetcher::new()), embedder());
    assert!(!comparer.is_enabled());
    assert!(comparer.compare(QUERY, 3).await.is_empty());
}

#[tokio::test]
async fn test_search_failure_yields_no_results() {
    let comparer = comparer(
        Arc::new(MockSearchProvider::failing()),
        Arc::new(MockPageFetcher::new()),
    );
    assert!(comparer.compare(QUERY, 3).await.is_empty());
}

#[tokio::test]
async fn test_best_paragraph_wins() {
    let (search, fetcher) = two_pages();
    let results = comparer(search, fetcher).compare(QUERY, 3).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "https://biology.example");
    assert_eq!(results[0].title, "Biology");
    assert_eq!(results[0].snippet, QUERY);
    assert_eq!(results[0].score, 1.0);
    assert!(results[1].score < results[0].score);
}

#[tokio::test]
async fn test_top_k_limits_results() {
    let (search, fetcher) = two_pages();
    let results = comparer(search, fetcher).compare(QUERY, 1).await;
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_failed_pages_are_skipped() {
    let search = Arc::new(MockSearchProvider::new(vec![
        MockSearchProvider::hit("https://missing.example", "Missing"),
        MockSearchProvider::hit("https://ok.example", "Ok"),
        SearchHit::default(),
    ]));
    let fetcher = Arc::new(MockPageFetcher::new().with_page("https://ok.example", QUERY));

    let results = comparer(search, fetcher.clone()).compare(QUERY, 3).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "https://ok.example");
    assert_eq!(fetcher.calls(), 2, "hit without a link is never fetched");
}

#[tokio::test]
async fn test_blank_page_is_skipped() {
    let search = Arc::new(MockSearchProvider::new(vec![MockSearchProvider::hit(
        "https://blank.example",
        "Blank",
    )]));
    let fetcher = Arc::new(MockPageFetcher::new().with_page("https://blank.example", "  \n\n "));

    assert!(comparer(search, fetcher).compare(QUERY, 3).await.is_empty());
}

#[tokio::test]
async fn test_results_are_cached() {
    let (search, fetcher) = two_pages();
    let comparer = comparer(search.clone(), fetcher.clone());

    let first = comparer.compare(QUERY, 3).await;
    let second = comparer.compare(QUERY, 3).await;

    assert_eq!(first, second);
    assert_eq!(search.calls(), 1);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_chunk_limit_applies_per_page() {
    let search = Arc::new(MockSearchProvider::new(vec![MockSearchProvider::hit(
        "https://long.example",
        "Long",
    )]));
    let fetcher = Arc::new(
        MockPageFetcher::new()
            .with_page("https://long.example", &format!("One.\n\nTwo.\n\n{QUERY}")),
    );

    let results = comparer(search, fetcher)
        .with_limits(5, 2)
        .compare(QUERY, 3)
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].score < 1.0);
    assert_ne!(results[0].snippet, QUERY);
}

#[tokio::test]
async fn test_search_respects_max_results() {
    let (search, fetcher) = two_pages();
    let results = comparer(search, fetcher.clone())
        .with_limits(1, 10)
        .compare(QUERY, 3)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(fetcher.calls(), 1);
}
