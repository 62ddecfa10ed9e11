//! Unbounded fixed-backoff retry around single page attempts.

use std::time::Duration;

use log::warn;
use tokio_util::sync::CancellationToken;

use crate::github::error::{SearchError, SearchResult};
use crate::github::page::PageFetcher;
use crate::github::rate_governor::RateGovernor;
use crate::github::types::{PageCursor, SearchPage};

/// Retries transient page failures indefinitely with a fixed backoff;
/// everything else propagates immediately and aborts the enclosing
/// iteration.
///
/// There is deliberately no retry cap: the recognized transient
/// classes resolve themselves within a scrape's operational timeframe,
/// and the caller has no fallback path.
pub struct RetryPolicy {
    backoff: Duration,
}

impl RetryPolicy {
    /// Build a policy with the given backoff interval.
    #[must_use]
    pub fn new(backoff: Duration) -> Self {
        Self { backoff }
    }

    /// Fetch one page, drawing a governor slot before every attempt
    /// (retries included) and sleeping the backoff between attempts.
    pub async fn fetch<F: PageFetcher>(
        &self,
        fetcher: &F,
        governor: &RateGovernor,
        query: &str,
        cursor: Option<PageCursor>,
        cancel: &CancellationToken,
    ) -> SearchResult<SearchPage> {
        loop {
            governor.acquire(cancel).await?;
            match fetcher.fetch_page(query, cursor).await {
                Ok(page) => return Ok(page),
                Err(err) if err.is_transient() => {
                    warn!("transient search failure, sleeping {:?}: {err}", self.backoff);
                    tokio::select! {
                        () = cancel.cancelled() => return Err(SearchError::Cancelled),
                        () = tokio::time::sleep(self.backoff) => {}
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}
