//! `repo-census` - exhaustive GitHub repository metadata retrieval
//!
//! This library drives the GitHub search API past its hard result caps
//! (1000 results per query window, 100 per page) to produce the
//! complete, duplicate-free set of repositories matching a query, as a
//! lazy record stream suitable for CSV output.
//!
//! The pipeline, leaves first: a [`RateGovernor`] paces outbound
//! requests to an hourly ceiling; a [`PageFetcher`] executes one page
//! query; a [`RetryPolicy`] retries transient provider failures
//! indefinitely; an [`ExhaustiveSearch`] stitches overlapping result
//! windows together (offset walking or timestamp watermarking) while
//! deduplicating by repository id; and a [`DateRangePartitioner`]
//! slices oversized queries into disjoint creation-date ranges.

// Module declarations
pub mod github;
pub mod output;
pub mod runtime;

// Re-export runtime types
pub use runtime::AsyncStream;

// Re-export GitHub client types
pub use github::{GitHubClient, GitHubClientBuilder};

// Re-export error types
pub use github::{SearchError, SearchResult};

// Re-export the search pipeline
pub use github::{
    DateRangePartitioner, ExhaustiveSearch, GraphqlFetcher, PageCursor, PageFetcher,
    PartitionGranularity, RateGovernor, RepoRecord, RetryPolicy, SearchConfig, SearchPage,
    SearchQuery, SearchStrategy, SortField,
};

// Re-export output sinks
pub use output::{CsvSink, RecordSink};
