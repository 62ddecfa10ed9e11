//! Creation-date partitioning for queries expected to exceed what a
//! single exhaustive iteration can retrieve.

use chrono::NaiveDate;
use futures::StreamExt;
use log::info;
use tokio_util::sync::CancellationToken;

use crate::github::error::{SearchError, SearchResult};
use crate::github::page::PageFetcher;
use crate::github::search::ExhaustiveSearch;
use crate::github::types::SearchQuery;
use crate::output::RecordSink;

/// How finely each day is sliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionGranularity {
    /// One partition per calendar day
    Day,
    /// 24 partitions per calendar day
    Hour,
}

/// Subdivides a query into disjoint creation-date ranges and runs one
/// independent exhaustive iteration per partition.
///
/// Creation date is immutable and the ranges are disjoint, so no
/// entity can appear in two partitions and no cross-partition
/// deduplication is needed.
#[derive(Debug)]
pub struct DateRangePartitioner {
    start: NaiveDate,
    end: NaiveDate,
    granularity: PartitionGranularity,
}

impl DateRangePartitioner {
    /// Build a partitioner over the inclusive `[start, end]` day range (UTC).
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        granularity: PartitionGranularity,
    ) -> SearchResult<Self> {
        if start > end {
            return Err(SearchError::InvalidQuery(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self {
            start,
            end,
            granularity,
        })
    }

    /// Calendar days covered, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// Disjoint `created:` range clauses for one day.
    #[must_use]
    pub fn slices(&self, day: NaiveDate) -> Vec<String> {
        match self.granularity {
            PartitionGranularity::Day => {
                vec![format!("created:{day}T00:00:00Z..{day}T23:59:59Z")]
            }
            PartitionGranularity::Hour => (0..24)
                .map(|hour| format!("created:{day}T{hour:02}:00:00Z..{day}T{hour:02}:59:59Z"))
                .collect(),
        }
    }

    /// Run one exhaustive iteration per partition, forwarding every
    /// yielded record to the sink.
    ///
    /// Partitions run sequentially; the first fatal error (or
    /// cancellation) aborts the remaining ones. Each partition gets
    /// its own seen-set inside the search iteration.
    pub async fn run<F, S>(
        &self,
        search: &ExhaustiveSearch<F>,
        query: &SearchQuery,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> SearchResult<()>
    where
        F: PageFetcher + 'static,
        S: RecordSink,
    {
        for day in self.days() {
            let mut day_total = 0usize;
            for clause in self.slices(day) {
                let partition = query.clone().with_created(clause);
                let mut stream = search.run(partition, cancel.clone());
                while let Some(item) = stream.next().await {
                    let repo = item?;
                    sink.write_record(&repo)?;
                    day_total += 1;
                }
            }
            info!("collected {day_total} results for {day}");
        }
        sink.flush()?;
        Ok(())
    }
}
