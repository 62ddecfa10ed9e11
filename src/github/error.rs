//! Search error taxonomy and transient classification.

use std::time::Duration;
use thiserror::Error;

/// Error message fragments that identify self-resolving failures.
///
/// These are the provider texts observed on secondary rate limiting,
/// generic transient server failures, and gateway timeouts. Anything
/// else aborts the enclosing iteration.
const TRANSIENT_PATTERNS: [&str; 3] = [
    "You have exceeded a secondary rate limit",
    "Something went wrong while executing your query",
    "504 Gateway Timeout",
];

/// Error types for search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// GitHub API error (transport or GraphQL-level)
    #[error("GitHub API error: {0}")]
    Api(String),

    /// Per-request deadline exceeded
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Authentication required or failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Malformed or rejected search query
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Response did not match the expected page shape
    #[error("response decode error: {0}")]
    Decode(String),

    /// Client setup/configuration error
    #[error("client setup failed: {0}")]
    ClientSetup(String),

    /// Output sink failure
    #[error("output error: {0}")]
    Output(#[from] csv::Error),

    /// External cancellation signal observed
    #[error("operation cancelled")]
    Cancelled,
}

/// Convenience result alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

impl SearchError {
    /// Whether this error is expected to resolve itself after a fixed
    /// wait, warranting an unbounded retry of the identical request.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(msg) => TRANSIENT_PATTERNS.iter().any(|p| msg.contains(p)),
            // Only provider-reported failures qualify; a locally-elapsed
            // deadline aborts the run rather than looping against an
            // endpoint that may be hard down.
            _ => false,
        }
    }
}

impl From<octocrab::Error> for SearchError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => match source.status_code.as_u16() {
                401 => SearchError::Auth(source.message),
                422 => SearchError::InvalidQuery(source.message),
                _ => SearchError::Api(source.message),
            },
            other => SearchError::Api(other.to_string()),
        }
    }
}
