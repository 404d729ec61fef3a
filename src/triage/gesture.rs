// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Swipe gesture interpretation and drag feedback

use crate::store::Verdict;

/// Maximum card rotation, reached at a drag of one full viewport width
pub const MAX_ROTATION_DEG: f64 = 15.0;

/// Opacity the preloaded next image reaches at a full-width drag
pub const PREVIEW_OPACITY: f64 = 0.7;

/// Background colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const NEUTRAL: Rgba = Rgba { r: 0, g: 0, b: 0, a: 1.0 };
    pub const APPROVE: Rgba = Rgba { r: 72, g: 180, b: 67, a: 1.0 };
    pub const DECLINE: Rgba = Rgba { r: 200, g: 54, b: 45, a: 1.0 };

    fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

/// Thresholds that turn raw displacement into decisions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeGeometry {
    pub viewport_width: f64,
    /// Fraction of the width a release must exceed to commit
    pub threshold: f64,
    /// Fraction of the width at which background feedback saturates
    pub saturation: f64,
}

impl SwipeGeometry {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            threshold: 0.2,
            saturation: 0.5,
        }
    }

    pub fn from_config(config: &crate::config::TriageConfig) -> Self {
        Self {
            viewport_width: config.viewport_width,
            threshold: config.swipe_threshold,
            saturation: config.feedback_saturation,
        }
    }

    /// What a release at net displacement `(dx, dy)` means
    pub fn interpret(&self, dx: f64, dy: f64) -> GestureOutcome {
        if dx.abs() <= dy.abs() {
            return GestureOutcome::Ignored;
        }

        if dx.abs() > self.viewport_width * self.threshold {
            if dx > 0.0 {
                GestureOutcome::Commit(Verdict::Approve)
            } else {
                GestureOutcome::Commit(Verdict::Decline)
            }
        } else {
            GestureOutcome::SnapBack
        }
    }

    /// Visual feedback while dragging. Vertical drags produce none.
    pub fn feedback(&self, dx: f64, dy: f64) -> Option<DragFeedback> {
        if dx.abs() <= dy.abs() || self.viewport_width <= 0.0 {
            return None;
        }

        let fraction = (dx.abs() / self.viewport_width).min(1.0);
        let intensity = (fraction / self.saturation).min(1.0);
        let accent = if dx > 0.0 { Rgba::APPROVE } else { Rgba::DECLINE };

        Some(DragFeedback {
            offset_x: dx,
            rotation_deg: dx / self.viewport_width * MAX_ROTATION_DEG,
            background: accent.with_alpha(intensity),
            preview_opacity: fraction * PREVIEW_OPACITY,
        })
    }
}

/// Result of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Mostly vertical: treated as a scroll
    Ignored,
    /// Horizontal but short: the card returns to neutral
    SnapBack,
    Commit(Verdict),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFeedback {
    pub offset_x: f64,
    pub rotation_deg: f64,
    pub background: Rgba,
    /// Opacity of the preloaded next image showing through
    pub preview_opacity: f64,
}

/// Per-item gesture state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemState {
    Idle,
    Dragging { start_x: f64, start_y: f64 },
    Committed(Verdict),
    SnappedBack,
}

/// Tracks one pointer from press to release
#[derive(Debug, Clone)]
pub struct DragTracker {
    geometry: SwipeGeometry,
    state: ItemState,
}

impl DragTracker {
    pub fn new(geometry: SwipeGeometry) -> Self {
        Self {
            geometry,
            state: ItemState::Idle,
        }
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn geometry(&self) -> &SwipeGeometry {
        &self.geometry
    }

    /// Viewport resized
    pub fn set_viewport_width(&mut self, width: f64) {
        self.geometry.viewport_width = width;
    }

    /// Pointer down. Ignored unless idle (a committed item waits for `settle`).
    pub fn press(&mut self, x: f64, y: f64) {
        if matches!(self.state, ItemState::Idle | ItemState::SnappedBack) {
            self.state = ItemState::Dragging { start_x: x, start_y: y };
        }
    }

    pub fn motion(&self, x: f64, y: f64) -> Option<DragFeedback> {
        match self.state {
            ItemState::Dragging { start_x, start_y } => self.geometry.feedback(x - start_x, y - start_y),
            _ => None,
        }
    }

    /// Pointer up. Returns the outcome if a drag was in progress.
    pub fn release(&mut self, x: f64, y: f64) -> Option<GestureOutcome> {
        let ItemState::Dragging { start_x, start_y } = self.state else {
            return None;
        };

        let outcome = self.geometry.interpret(x - start_x, y - start_y);
        self.state = match outcome {
            GestureOutcome::Commit(verdict) => ItemState::Committed(verdict),
            GestureOutcome::SnapBack => ItemState::SnappedBack,
            GestureOutcome::Ignored => ItemState::Idle,
        };
        Some(outcome)
    }

    /// Return to idle: after a snap-back, or once a committed decision has
    /// settled (successfully or not)
    pub fn settle(&mut self) {
        self.state = ItemState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_threshold_is_fifth_of_width() {
        let g = SwipeGeometry::new(1000.0);
        assert_eq!(g.interpret(250.0, 10.0), GestureOutcome::Commit(Verdict::Approve));
        assert_eq!(g.interpret(-250.0, 10.0), GestureOutcome::Commit(Verdict::Decline));
        assert_eq!(g.interpret(200.0, 0.0), GestureOutcome::SnapBack);
        assert_eq!(g.interpret(201.0, 0.0), GestureOutcome::Commit(Verdict::Approve));
    }

    #[test]
    fn test_short_swipe_snaps_back() {
        let g = SwipeGeometry::new(1000.0);
        assert_eq!(g.interpret(50.0, 10.0), GestureOutcome::SnapBack);
        assert_eq!(g.interpret(150.0, 10.0), GestureOutcome::SnapBack);
        assert_eq!(g.interpret(-120.0, 5.0), GestureOutcome::SnapBack);
    }

    #[test]
    fn test_lower_threshold_commits_shorter_swipes() {
        let g = SwipeGeometry { threshold: 0.1, ..SwipeGeometry::new(1000.0) };
        assert_eq!(g.interpret(150.0, 10.0), GestureOutcome::Commit(Verdict::Approve));
        assert_eq!(g.interpret(50.0, 10.0), GestureOutcome::SnapBack);
    }

    #[test]
    fn test_vertical_gesture_ignored() {
        let g = SwipeGeometry::new(1000.0);
        assert_eq!(g.interpret(300.0, 400.0), GestureOutcome::Ignored);
        assert_eq!(g.interpret(300.0, -300.0), GestureOutcome::Ignored);
        assert_eq!(g.interpret(0.0, 0.0), GestureOutcome::Ignored);
        assert!(g.feedback(10.0, 50.0).is_none());
    }

    #[test]
    fn test_feedback_scales_and_saturates() {
        let g = SwipeGeometry::new(1000.0);

        let fb = g.feedback(250.0, 0.0).unwrap();
        assert!(approx(fb.rotation_deg, 3.75));
        assert!(approx(fb.background.a, 0.5));
        assert_eq!((fb.background.r, fb.background.g, fb.background.b), (72, 180, 67));
        assert!(approx(fb.preview_opacity, 0.175));

        let fb = g.feedback(-600.0, 0.0).unwrap();
        assert!(approx(fb.rotation_deg, -9.0));
        assert!(approx(fb.background.a, 1.0));
        assert_eq!((fb.background.r, fb.background.g, fb.background.b), (200, 54, 45));

        let fb = g.feedback(2500.0, 0.0).unwrap();
        assert!(approx(fb.preview_opacity, PREVIEW_OPACITY));
    }

    #[test]
    fn test_tracker_commit_flow() {
        let mut t = DragTracker::new(SwipeGeometry::new(1000.0));
        t.press(100.0, 100.0);
        assert!(matches!(t.state(), ItemState::Dragging { .. }));
        assert!(t.motion(300.0, 110.0).is_some());

        let outcome = t.release(400.0, 110.0);
        assert_eq!(outcome, Some(GestureOutcome::Commit(Verdict::Approve)));
        assert_eq!(t.state(), ItemState::Committed(Verdict::Approve));

        // Presses are ignored until the decision settles
        t.press(0.0, 0.0);
        assert_eq!(t.state(), ItemState::Committed(Verdict::Approve));
        t.settle();
        assert_eq!(t.state(), ItemState::Idle);
    }

    #[test]
    fn test_tracker_snap_back_keeps_item() {
        let mut t = DragTracker::new(SwipeGeometry::new(1000.0));
        t.press(500.0, 500.0);
        assert_eq!(t.release(450.0, 490.0), Some(GestureOutcome::SnapBack));
        assert_eq!(t.state(), ItemState::SnappedBack);

        t.press(500.0, 500.0);
        assert!(matches!(t.state(), ItemState::Dragging { .. }));
    }

    #[test]
    fn test_release_without_press() {
        let mut t = DragTracker::new(SwipeGeometry::new(1000.0));
        assert_eq!(t.release(900.0, 0.0), None);
        assert!(t.motion(900.0, 0.0).is_none());
    }
}
