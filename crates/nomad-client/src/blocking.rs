//! Blocking queries: re-issue a read with the last seen index until the
//! server answers with something the caller accepts.

use std::{future::Future, time::Duration};

use tokio::time::Instant;
use tracing::debug;

use crate::error::{NomadError, Result};
use crate::options::QueryOptions;
use crate::response::ServerQueryResponse;

/// Longest wait the servers honor for a single blocking request
pub const DEFAULT_MAX_WAIT_PER_REQUEST: Duration = Duration::from_secs(300);

// the wait parameter has millisecond resolution
const MIN_WAIT: Duration = Duration::from_millis(1);

/// Overall deadline of a blocking poll plus the wait asked for on each request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitStrategy {
    deadline: Instant,
    max_wait_per_request: Duration,
}

impl WaitStrategy {
    /// Give up after `duration` from now
    pub fn for_duration(duration: Duration) -> Self {
        Self::until(Instant::now() + duration)
    }

    pub fn until(deadline: Instant) -> Self {
        Self {
            deadline,
            max_wait_per_request: DEFAULT_MAX_WAIT_PER_REQUEST,
        }
    }

    pub fn with_max_wait_per_request(mut self, wait: Duration) -> Self {
        self.max_wait_per_request = wait;
        self
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Wait to request next, or None once less than a millisecond is left
    fn next_wait(&self) -> Option<Duration> {
        let remaining = self.deadline.checked_duration_since(Instant::now())?;
        if remaining < MIN_WAIT {
            return None;
        }
        Some(remaining.min(self.max_wait_per_request))
    }
}

/// Poll `query` until `predicate` accepts a response or the strategy's
/// deadline passes.
///
/// The first request uses `options` as given; later ones set `index` to the
/// last response's index so the server blocks until the data changes. The
/// watch index resets to 0 when the server reports an older index than the
/// one already seen (e.g. after a snapshot restore).
pub async fn poll_until<T, F, Fut, P>(
    options: Option<&QueryOptions>,
    strategy: WaitStrategy,
    mut query: F,
    mut predicate: P,
) -> Result<ServerQueryResponse<T>>
where
    F: FnMut(QueryOptions) -> Fut,
    Fut: Future<Output = Result<ServerQueryResponse<T>>>,
    P: FnMut(&ServerQueryResponse<T>) -> bool,
{
    let mut options = options.cloned().unwrap_or_default();
    let mut last_index = options.index;

    loop {
        let Some(wait) = strategy.next_wait() else {
            return Err(NomadError::Timeout);
        };
        options.wait = Some(wait);

        let response = query(options.clone()).await?;
        if predicate(&response) {
            return Ok(response);
        }

        let index = match last_index {
            Some(seen) if response.index < seen => {
                debug!(
                    "index went backwards from {} to {}, resetting watch",
                    seen, response.index
                );
                0
            }
            _ => response.index,
        };
        last_index = Some(index);
        options.index = Some(index);
    }
}
