//! Exhaustive search iteration.
//!
//! Yields the complete, duplicate-free set of repositories matching a
//! query, working around the provider's hard ceiling on results
//! visible to any single sort order (1000 matches, 10 pages of 100).
//! Two interchangeable windowing strategies implement one contract;
//! see [`SearchStrategy`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::github::config::SearchConfig;
use crate::github::error::{SearchError, SearchResult};
use crate::github::page::PageFetcher;
use crate::github::rate_governor::RateGovernor;
use crate::github::retry::RetryPolicy;
use crate::github::types::{PageCursor, RepoRecord, SearchQuery, SearchStrategy, SortField};
use crate::runtime::AsyncStream;

/// Drives page requests through the retry policy and rate governor,
/// yielding deduplicated records as a lazy stream.
pub struct ExhaustiveSearch<F> {
    fetcher: Arc<F>,
    governor: Arc<RateGovernor>,
    strategy: SearchStrategy,
    config: SearchConfig,
}

impl<F: PageFetcher + 'static> ExhaustiveSearch<F> {
    pub fn new(
        fetcher: Arc<F>,
        governor: Arc<RateGovernor>,
        strategy: SearchStrategy,
        config: SearchConfig,
    ) -> Self {
        Self {
            fetcher,
            governor,
            strategy,
            config,
        }
    }

    /// Start one iteration over everything matching `query`.
    ///
    /// The returned stream is finite and non-restartable: it ends on
    /// exhaustion, on consumer drop, or with a terminal `Err` element
    /// on fatal failure or cancellation. The seen-set lives for
    /// exactly this invocation.
    pub fn run(
        &self,
        query: SearchQuery,
        cancel: CancellationToken,
    ) -> AsyncStream<SearchResult<RepoRecord>> {
        let (tx, stream) = AsyncStream::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let governor = Arc::clone(&self.governor);
        let strategy = self.strategy;
        let config = self.config.clone();

        tokio::spawn(async move {
            let retry = RetryPolicy::new(config.retry_backoff);
            let outcome = match strategy {
                SearchStrategy::OverlappingOffset { sort } => {
                    run_offset(
                        fetcher.as_ref(),
                        &governor,
                        &retry,
                        &config,
                        &query,
                        sort,
                        &tx,
                        &cancel,
                    )
                    .await
                }
                SearchStrategy::Watermark => {
                    run_watermark(
                        fetcher.as_ref(),
                        &governor,
                        &retry,
                        &query,
                        &tx,
                        &cancel,
                    )
                    .await
                }
            };
            if let Err(err) = outcome {
                // Terminal element; ignored if the consumer already left.
                let _ = tx.send(Err(err));
            }
        });

        stream
    }
}

/// Sort descending by the target metric and walk offsets 0, 91, 182, …
/// up to the window ceiling. The step is smaller than the page size so
/// each page overlaps the previous by a few results, defending against
/// server-side ordering instability; the seen-set collapses the
/// overlap.
#[allow(clippy::too_many_arguments)]
async fn run_offset<F: PageFetcher>(
    fetcher: &F,
    governor: &RateGovernor,
    retry: &RetryPolicy,
    config: &SearchConfig,
    query: &SearchQuery,
    sort: SortField,
    tx: &UnboundedSender<SearchResult<RepoRecord>>,
    cancel: &CancellationToken,
) -> SearchResult<()> {
    let assembled = query.clone().with_sort(sort.descending_clause()).assemble();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut prev_trailing: Option<i64> = None;
    let mut offset = 0u32;

    while offset < config.window_ceiling {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        let cursor = (offset > 0).then_some(PageCursor { offset });
        let page = retry
            .fetch(fetcher, governor, &assembled, cursor, cancel)
            .await?;

        let has_next = page.has_next_page;
        let trailing = page.items.last().map(|r| r.database_id);
        let mut fresh = 0usize;
        for repo in page.items {
            if seen.insert(repo.database_id) {
                fresh += 1;
                if tx.send(Ok(repo)).is_err() {
                    return Ok(()); // consumer stopped pulling
                }
            }
        }

        if !has_next {
            break;
        }
        // Identical trailing boundary with nothing new means the
        // window has stopped moving; bail instead of spinning.
        if fresh == 0 && trailing == prev_trailing {
            warn!("offset window made no progress at offset {offset}, stopping");
            break;
        }
        prev_trailing = trailing;
        offset += config.offset_step;
    }

    debug!("offset iteration complete: {} unique repositories", seen.len());
    Ok(())
}

/// Sort ascending by last-push time and re-issue the query bounded
/// below by the maximum timestamp seen, instead of paging deeper.
///
/// Ties at the exact watermark are expected: the boundary record comes
/// back at the head of the next window and the seen-set drops it,
/// while distinct records sharing its timestamp are kept.
async fn run_watermark<F: PageFetcher>(
    fetcher: &F,
    governor: &RateGovernor,
    retry: &RetryPolicy,
    query: &SearchQuery,
    tx: &UnboundedSender<SearchResult<RepoRecord>>,
    cancel: &CancellationToken,
) -> SearchResult<()> {
    let sorted = query.clone().with_sort("sort:updated-asc");
    let mut seen: HashSet<i64> = HashSet::new();
    let mut watermark: Option<DateTime<Utc>> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        let mut bounded = sorted.clone();
        if let Some(mark) = watermark {
            bounded = bounded.with_pushed(format!(
                "pushed:>={}",
                mark.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
        }
        let assembled = bounded.assemble();
        let page = retry
            .fetch(fetcher, governor, &assembled, None, cancel)
            .await?;

        let has_next = page.has_next_page;
        let page_mark = page.items.iter().filter_map(|r| r.pushed_at).max();
        for repo in page.items {
            if seen.insert(repo.database_id) && tx.send(Ok(repo)).is_err() {
                return Ok(()); // consumer stopped pulling
            }
        }

        if !has_next {
            break;
        }
        match page_mark {
            Some(mark) if watermark != Some(mark) => watermark = Some(mark),
            // A full page of exact ties cannot advance the bound.
            _ => {
                warn!("watermark did not advance past {watermark:?}, stopping");
                break;
            }
        }
    }

    debug!(
        "watermark iteration complete: {} unique repositories",
        seen.len()
    );
    Ok(())
}
