//! End-to-end properties: idempotent output and prompt cancellation.

use std::sync::Arc;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use repo_census::{
    CsvSink, ExhaustiveSearch, RateGovernor, RecordSink, SearchConfig, SearchError, SearchQuery,
    SearchStrategy, SortField,
};

use super::fixture::{ScriptedFetcher, repo};

fn offset_search(fetcher: Arc<ScriptedFetcher>) -> ExhaustiveSearch<ScriptedFetcher> {
    let config = SearchConfig::default();
    let governor = Arc::new(RateGovernor::per_hour(config.requests_per_hour));
    ExhaustiveSearch::new(
        fetcher,
        governor,
        SearchStrategy::OverlappingOffset {
            sort: SortField::Stars,
        },
        config,
    )
}

async fn scrape_to_csv(corpus: Vec<repo_census::RepoRecord>) -> Vec<u8> {
    let search = offset_search(Arc::new(ScriptedFetcher::new(corpus)));
    let mut sink = CsvSink::new(Vec::new());
    let mut stream = search.run(
        SearchQuery::new("language:rust"),
        CancellationToken::new(),
    );
    while let Some(item) = stream.next().await {
        sink.write_record(&item.unwrap()).unwrap();
    }
    sink.flush().unwrap();
    sink.into_inner().unwrap()
}

#[tokio::test(start_paused = true)]
async fn rerun_against_unchanged_backend_is_byte_identical() {
    let corpus: Vec<_> = (1..=150).map(|id| repo(id, 1000 - id)).collect();
    let first = scrape_to_csv(corpus.clone()).await;
    let second = scrape_to_csv(corpus).await;
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn cancelled_token_stops_the_stream_promptly() {
    let fetcher = Arc::new(ScriptedFetcher::new(
        (1..=300).map(|id| repo(id, 1000 - id)).collect(),
    ));
    let search = offset_search(Arc::clone(&fetcher));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut stream = search.run(SearchQuery::new("language:rust"), cancel);

    let first = stream.next().await.expect("terminal element");
    assert!(matches!(first, Err(SearchError::Cancelled)));
    assert!(stream.next().await.is_none());
    assert_eq!(fetcher.calls(), 0, "no requests after cancellation");
}
