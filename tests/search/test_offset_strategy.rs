//! Overlapping-offset windowing over a synthetic backend.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use repo_census::{
    ExhaustiveSearch, RateGovernor, SearchConfig, SearchQuery, SearchStrategy, SortField,
};

use super::fixture::{ScriptedFetcher, collect_records, repo};

fn star_sorted_corpus(len: i64) -> Vec<repo_census::RepoRecord> {
    // Descending stars, ids 1..=len
    (1..=len).map(|id| repo(id, 10_000 - id)).collect()
}

fn search_over(
    fetcher: ScriptedFetcher,
    config: SearchConfig,
) -> ExhaustiveSearch<ScriptedFetcher> {
    let governor = Arc::new(RateGovernor::per_hour(config.requests_per_hour));
    ExhaustiveSearch::new(
        Arc::new(fetcher),
        governor,
        SearchStrategy::OverlappingOffset {
            sort: SortField::Stars,
        },
        config,
    )
}

#[tokio::test(start_paused = true)]
async fn overlap_walk_recovers_all_300_without_gaps() {
    let search = search_over(
        ScriptedFetcher::new(star_sorted_corpus(300)),
        SearchConfig::default(),
    );
    let records = collect_records(search.run(
        SearchQuery::new("language:rust"),
        CancellationToken::new(),
    ))
    .await;

    assert_eq!(records.len(), 300);
    let ids: HashSet<i64> = records.iter().map(|r| r.database_id).collect();
    assert_eq!(ids.len(), 300, "no two records may share an identifier");
    for id in 1..=300 {
        assert!(ids.contains(&id), "id {id} fell through an overlap gap");
    }
}

#[tokio::test(start_paused = true)]
async fn stops_at_window_ceiling() {
    // 2000 matches, but only the first 1000 are addressable per window.
    let search = search_over(
        ScriptedFetcher::new(star_sorted_corpus(2000)),
        SearchConfig::default(),
    );
    let records = collect_records(search.run(
        SearchQuery::new("language:rust"),
        CancellationToken::new(),
    ))
    .await;

    // Offsets 0, 91, …, 910: last window ends at 1010.
    assert_eq!(records.len(), 1010);
    let ids: HashSet<i64> = records.iter().map(|r| r.database_id).collect();
    assert_eq!(ids.len(), records.len());
}

#[tokio::test(start_paused = true)]
async fn empty_result_set_terminates_immediately() {
    let fetcher = ScriptedFetcher::new(Vec::new());
    let search = search_over(fetcher, SearchConfig::default());
    let records = collect_records(search.run(
        SearchQuery::new("language:whitespace"),
        CancellationToken::new(),
    ))
    .await;
    assert!(records.is_empty());
}

#[tokio::test(start_paused = true)]
async fn sort_clause_is_appended_to_the_query() {
    // A corpus keyed on the sort clause only matches when the strategy
    // actually appended it.
    let fetcher = ScriptedFetcher::keyed(vec![("sort:stars-desc", star_sorted_corpus(3))]);
    let search = search_over(fetcher, SearchConfig::default());
    let records = collect_records(search.run(
        SearchQuery::new("language:rust"),
        CancellationToken::new(),
    ))
    .await;
    assert_eq!(records.len(), 3);
}
