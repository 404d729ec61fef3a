// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Periodic check of the pending directory for out-of-band changes

use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use super::remote::ImageService;
use super::session::TriageSession;

/// Result of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Observed length matches the local queue
    Unchanged,
    /// Images appeared while the session was showing the empty state
    Arrived,
    /// Images were added or removed elsewhere
    Changed { known: usize, observed: usize },
    /// A reload was due but a decision was in flight; the next poll retries
    Deferred,
    /// The listing could not be fetched
    Failed,
}

impl PollOutcome {
    pub fn needs_reload(&self) -> bool {
        matches!(self, Self::Arrived | Self::Changed { .. })
    }
}

/// Compare the local queue length with a freshly observed one
pub fn compare(known: usize, observed: usize) -> PollOutcome {
    if known == 0 && observed > 0 {
        PollOutcome::Arrived
    } else if known > 0 && observed != known {
        PollOutcome::Changed { known, observed }
    } else {
        PollOutcome::Unchanged
    }
}

/// Drives the poll cadence
pub struct Poller {
    ticker: Interval,
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { ticker }
    }

    /// Wait for the next poll time. The first call returns immediately.
    pub async fn tick(&mut self) {
        self.ticker.tick().await;
    }

    /// Fetch the pending list and compare it to the session's queue
    pub async fn check<S: ImageService + ?Sized>(session: &TriageSession, service: &S) -> PollOutcome {
        match service.list_pending().await {
            Ok(images) => {
                let outcome = compare(session.len(), images.len());
                debug!("Poll: {:?}", outcome);
                outcome
            }
            Err(e) => {
                warn!("Error checking for new images: {}", e);
                PollOutcome::Failed
            }
        }
    }

    /// Poll once and resynchronize the session if needed.
    ///
    /// Returns `Deferred` instead of the comparison when the reload was
    /// skipped, so `needs_reload` on the result means the queue was rebuilt.
    ///
    /// The comparison is not coordinated with a decision in flight: a poll
    /// that lands between the server-side move and the local removal sees a
    /// stale length. The resulting reload is dropped if the session is still
    /// busy, otherwise it simply rebuilds the queue.
    pub async fn poll_once<S: ImageService + ?Sized>(session: &mut TriageSession, service: &S) -> PollOutcome {
        let outcome = Self::check(session, service).await;
        if outcome.needs_reload() && !session.resync(service).await {
            return PollOutcome::Deferred;
        }
        outcome
    }
}
