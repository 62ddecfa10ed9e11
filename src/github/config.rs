//! Configuration for search operations

use std::time::Duration;

/// Configuration for search operations
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Results per page (GitHub API max is 100)
    pub page_size: u8,
    /// Hard ceiling on results visible to a single sort order
    pub window_ceiling: u32,
    /// Offset advance per page; smaller than the page size so that
    /// successive pages overlap as a defense against server-side
    /// ordering instability
    pub offset_step: u32,
    /// Fixed sleep between retries of a transient failure
    pub retry_backoff: Duration,
    /// Deadline for one network request
    pub request_timeout: Duration,
    /// Outbound request ceiling enforced by the rate governor
    pub requests_per_hour: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            window_ceiling: 1000,
            offset_step: 91, // 9-result overlap per page
            retry_backoff: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            requests_per_hour: 4900,
        }
    }
}
