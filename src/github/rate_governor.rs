//! Outbound request rate pacing.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::github::error::{SearchError, SearchResult};

/// Throttles outbound requests to a configured requests-per-hour
/// ceiling by handing out send slots one pacing interval apart.
///
/// The governor is the one shared, mutably-accessed resource in a run:
/// concurrent callers draw from the same slot sequence, so a single
/// global ceiling holds no matter how many iterations share it.
pub struct RateGovernor {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateGovernor {
    /// Build a governor enforcing `requests_per_hour` evenly over the hour.
    #[must_use]
    pub fn per_hour(requests_per_hour: u32) -> Self {
        let rate = requests_per_hour.max(1);
        Self {
            interval: Duration::from_secs_f64(3600.0 / f64::from(rate)),
            next_slot: Mutex::new(None),
        }
    }

    /// Block until a request slot is available, or until cancellation.
    ///
    /// Returns `SearchError::Cancelled` if the token fires before the
    /// slot arrives; the reserved slot is simply abandoned.
    pub async fn acquire(&self, cancel: &CancellationToken) -> SearchResult<()> {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        tokio::select! {
            () = cancel.cancelled() => Err(SearchError::Cancelled),
            () = tokio::time::sleep_until(slot) => Ok(()),
        }
    }
}
