//! GitHub search operations module
//!
//! Drives the repository search endpoint past its result caps using
//! the octocrab library.

pub mod client;
pub mod config;
pub mod error;
pub mod page;
pub mod partition;
pub mod rate_governor;
pub mod retry;
pub mod search;
pub mod types;

// Re-export client types
pub use client::{GitHubClient, GitHubClientBuilder};

// Re-export error types
pub use error::{SearchError, SearchResult};

// Re-export search machinery
pub use config::SearchConfig;
pub use page::{GraphqlFetcher, PageFetcher};
pub use partition::{DateRangePartitioner, PartitionGranularity};
pub use rate_governor::RateGovernor;
pub use retry::RetryPolicy;
pub use search::ExhaustiveSearch;
pub use types::{PageCursor, RepoRecord, SearchPage, SearchQuery, SearchStrategy, SortField};
