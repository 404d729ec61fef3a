// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Two display surfaces: one shows the current image, the other preloads the next

/// A single display slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    pub source: Option<String>,
    pub opacity: f64,
}

impl Surface {
    fn load(&mut self, name: Option<&str>, opacity: f64) {
        self.source = name.map(str::to_string);
        self.opacity = opacity;
    }
}

/// Double buffer over two surfaces
#[derive(Debug, Clone, Default)]
pub struct SurfacePair {
    surfaces: [Surface; 2],
    active: Option<usize>,
}

impl SurfacePair {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface currently in front, if anything has been shown yet
    pub fn active(&self) -> Option<&Surface> {
        self.active.map(|i| &self.surfaces[i])
    }

    /// Surface holding the preloaded next image
    pub fn standby(&self) -> &Surface {
        &self.surfaces[self.standby_index()]
    }

    fn standby_index(&self) -> usize {
        match self.active {
            Some(i) => 1 - i,
            None => 1,
        }
    }

    /// Present `current` and preload `next`.
    ///
    /// If the front surface already holds `current` at full opacity it is
    /// kept; otherwise `current` is loaded into the other surface, which is
    /// then brought to the front.
    pub fn show(&mut self, current: &str, next: Option<&str>) {
        let reuse = self
            .active()
            .map(|s| s.source.as_deref() == Some(current) && s.opacity >= 0.9)
            .unwrap_or(false);

        if !reuse {
            let target = match self.active {
                Some(i) => 1 - i,
                None => 0,
            };
            self.surfaces[target].load(Some(current), 1.0);
            self.active = Some(target);
        }

        let standby = self.standby_index();
        self.surfaces[standby].load(next, 0.0);
    }

    /// Commit transition: the outgoing image fades out and the preloaded one
    /// (if any) comes to the front
    pub fn advance(&mut self) {
        let Some(active) = self.active else {
            return;
        };

        self.surfaces[active].opacity = 0.0;
        let standby = 1 - active;
        if self.surfaces[standby].source.is_some() {
            self.surfaces[standby].opacity = 1.0;
            self.active = Some(standby);
        }
    }

    /// Undo a started transition after a failed decision
    pub fn restore(&mut self, current: &str) {
        if let Some(active) = self.active {
            if self.surfaces[active].source.as_deref() != Some(current) {
                self.surfaces[active].opacity = 0.0;
                let other = 1 - active;
                self.active = Some(other);
            }
        }
        if let Some(active) = self.active {
            self.surfaces[active].opacity = 1.0;
        }
    }

    /// Empty state: nothing on either surface
    pub fn clear(&mut self) {
        self.surfaces = Default::default();
        self.active = None;
    }
}
