// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Triage client: queue state, gestures, polling and service access

pub mod gesture;
pub mod poll;
pub mod remote;
pub mod session;
pub mod surface;

pub use gesture::{DragTracker, GestureOutcome, SwipeGeometry};
pub use poll::{PollOutcome, Poller};
pub use remote::{HttpImageService, ImageService};
pub use session::{Decision, TriageSession, View};
