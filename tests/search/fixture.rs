//! Shared in-memory search backend for pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use futures::StreamExt;
use repo_census::runtime::AsyncStream;
use repo_census::{
    PageCursor, PageFetcher, RecordSink, RepoRecord, SearchError, SearchPage, SearchResult,
};

/// Minimal record with a given identity and star count.
pub fn repo(id: i64, stars: i64) -> RepoRecord {
    RepoRecord {
        database_id: id,
        name_with_owner: format!("owner{id}/repo{id}"),
        stargazer_count: stars,
        ..Default::default()
    }
}

/// Record with a last-push timestamp, for watermark scenarios.
pub fn pushed_repo(id: i64, pushed: &str) -> RepoRecord {
    RepoRecord {
        pushed_at: Some(pushed.parse::<DateTime<Utc>>().unwrap()),
        ..repo(id, 0)
    }
}

/// In-memory backend mimicking the provider's paging semantics.
///
/// Offset cursors slice the (pre-sorted) corpus directly; queries
/// carrying `sort:updated-asc` get watermark semantics, honoring a
/// `pushed:>=` bound. Result sets can be keyed on a query substring so
/// partitioned queries route to disjoint fixtures, and failures can be
/// queued to precede the next attempts.
pub struct ScriptedFetcher {
    sets: Vec<(Option<String>, Vec<RepoRecord>)>,
    page_size: usize,
    failures: Mutex<VecDeque<SearchError>>,
    calls: AtomicU32,
}

impl ScriptedFetcher {
    pub fn new(corpus: Vec<RepoRecord>) -> Self {
        Self {
            sets: vec![(None, corpus)],
            page_size: 100,
            failures: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
        }
    }

    /// Route queries containing a needle to the paired result set.
    pub fn keyed(sets: Vec<(&str, Vec<RepoRecord>)>) -> Self {
        Self {
            sets: sets
                .into_iter()
                .map(|(needle, records)| (Some(needle.to_string()), records))
                .collect(),
            page_size: 100,
            failures: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn page_size(mut self, n: usize) -> Self {
        self.page_size = n;
        self
    }

    pub fn queue_failure(&self, err: SearchError) {
        self.failures.lock().unwrap().push_back(err);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn subset(&self, query: &str) -> &[RepoRecord] {
        self.sets
            .iter()
            .find(|(needle, _)| needle.as_deref().is_none_or(|n| query.contains(n)))
            .map_or(&[], |(_, records)| records.as_slice())
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(
        &self,
        query: &str,
        cursor: Option<PageCursor>,
    ) -> SearchResult<SearchPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }

        let subset = self.subset(query);

        if query.contains("sort:updated-asc") {
            let bound: Option<DateTime<Utc>> = query.split("pushed:>=").nth(1).map(|rest| {
                rest.split_whitespace()
                    .next()
                    .unwrap()
                    .parse()
                    .expect("well-formed watermark bound")
            });
            let mut matching: Vec<RepoRecord> = subset
                .iter()
                .filter(|r| match bound {
                    Some(b) => r.pushed_at.is_some_and(|p| p >= b),
                    None => true,
                })
                .cloned()
                .collect();
            matching.sort_by_key(|r| (r.pushed_at, r.database_id));
            let has_next_page = matching.len() > self.page_size;
            matching.truncate(self.page_size);
            return Ok(SearchPage {
                items: matching,
                has_next_page,
            });
        }

        let offset = cursor.map_or(0, |c| c.offset as usize);
        let end = (offset + self.page_size).min(subset.len());
        let items = subset.get(offset..end).unwrap_or(&[]).to_vec();
        Ok(SearchPage {
            items,
            has_next_page: end < subset.len(),
        })
    }
}

/// Sink that collects records in memory.
#[derive(Default)]
pub struct VecSink {
    pub records: Vec<RepoRecord>,
}

impl RecordSink for VecSink {
    fn write_record(&mut self, record: &RepoRecord) -> SearchResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> SearchResult<()> {
        Ok(())
    }
}

/// Drain a search stream, failing the test on any terminal error.
pub async fn collect_records(
    mut stream: AsyncStream<SearchResult<RepoRecord>>,
) -> Vec<RepoRecord> {
    let mut records = Vec::new();
    while let Some(item) = stream.next().await {
        records.push(item.expect("stream yielded an error"));
    }
    records
}
