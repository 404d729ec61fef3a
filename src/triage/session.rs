// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Client-side triage state: the pending queue, a cursor into it, and the
//! busy flag that serializes decisions

use std::time::Duration;
use tracing::{debug, error, warn};

use super::remote::ImageService;
use super::surface::SurfacePair;
use crate::store::Verdict;
use crate::Result;

/// A decision that has been started but not yet settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub filename: String,
    pub verdict: Verdict,
}

/// What the user should currently be looking at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    Empty,
    Image { filename: &'a str, remaining: usize },
}

/// Triage session state
#[derive(Debug, Default)]
pub struct TriageSession {
    queue: Vec<String>,
    cursor: usize,
    busy: bool,
    surfaces: SurfacePair,
}

impl TriageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session over an already known queue
    pub fn with_queue(images: Vec<String>) -> Self {
        let mut session = Self::new();
        session.replace_queue(images);
        session
    }

    /// Fetch the pending list and rebuild all local state from it.
    ///
    /// A failed fetch is logged and leaves the session empty.
    pub async fn reload<S: ImageService + ?Sized>(&mut self, service: &S) {
        match service.list_pending().await {
            Ok(images) => self.replace_queue(images),
            Err(e) => {
                error!("Error loading images: {}", e);
                self.replace_queue(Vec::new());
            }
        }
    }

    /// Replace the queue wholesale and rewind the cursor
    pub fn replace_queue(&mut self, images: Vec<String>) {
        debug!("Queue reloaded with {} images", images.len());
        self.queue = images;
        self.cursor = 0;
        self.surfaces.clear();
        self.render();
    }

    pub fn current(&self) -> Option<&str> {
        self.queue.get(self.cursor).map(String::as_str)
    }

    pub fn next(&self) -> Option<&str> {
        self.queue.get(self.cursor + 1).map(String::as_str)
    }

    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.cursor)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn surfaces(&self) -> &SurfacePair {
        &self.surfaces
    }

    pub fn view(&self) -> View<'_> {
        match self.current() {
            Some(filename) => View::Image {
                filename,
                remaining: self.remaining(),
            },
            None => View::Empty,
        }
    }

    fn render(&mut self) {
        let current = self.queue.get(self.cursor).cloned();
        let next = self.queue.get(self.cursor + 1).cloned();
        match current {
            Some(current) => self.surfaces.show(&current, next.as_deref()),
            None => self.surfaces.clear(),
        }
    }

    /// Start deciding the current item.
    ///
    /// Returns `None` without touching state when a decision is already in
    /// flight or there is nothing to decide.
    pub fn begin_decision(&mut self, verdict: Verdict) -> Option<Decision> {
        if self.busy {
            debug!("Decision dropped: another one is in flight");
            return None;
        }
        let filename = self.current()?.to_string();

        self.busy = true;
        self.surfaces.advance();
        Some(Decision { filename, verdict })
    }

    /// Apply the outcome of a decision started with `begin_decision`.
    ///
    /// On success the decided entry is removed in place, so the cursor now
    /// points at what was the next item. On failure nothing changes.
    pub fn complete_decision(&mut self, decision: &Decision, outcome: &Result<()>) {
        match outcome {
            Ok(()) => {
                if self.current() == Some(decision.filename.as_str()) {
                    self.queue.remove(self.cursor);
                } else if let Some(pos) = self.queue.iter().position(|f| *f == decision.filename) {
                    // Queue was rebuilt underneath us
                    self.queue.remove(pos);
                    if pos < self.cursor {
                        self.cursor -= 1;
                    }
                }
            }
            Err(e) => {
                error!("Failed to {} {}: {}", decision.verdict, decision.filename, e);
                self.surfaces.restore(&decision.filename);
            }
        }

        self.render();
        self.busy = false;
    }

    /// Decide the current item against `service`, holding the busy flag
    /// until the settle delay has passed.
    ///
    /// Returns `None` if the call was dropped, otherwise the service outcome.
    pub async fn decide<S: ImageService + ?Sized>(
        &mut self,
        service: &S,
        verdict: Verdict,
        settle: Duration,
    ) -> Option<Result<()>> {
        let decision = self.begin_decision(verdict)?;
        let outcome = service.decide(&decision.filename, decision.verdict).await;

        if outcome.is_ok() && !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        self.complete_decision(&decision, &outcome);
        Some(outcome)
    }

    /// Full resynchronization requested by the poller. Dropped while busy.
    pub async fn resync<S: ImageService + ?Sized>(&mut self, service: &S) -> bool {
        if self.busy {
            warn!("Reload skipped: decision in flight");
            return false;
        }
        self.reload(service).await;
        true
    }
}
