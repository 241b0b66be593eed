use crate::gesture::HandLandmarks;
use glam::Vec3;
use keystone_core::config::GestureConfig;
use keystone_core::constants::GROUND_LEVEL;
use keystone_core::math::snap_to_cell;
use keystone_core::types::{GridCell, WorldPos};

/// Ground-plane cursor driven by a normalized 2D pointer (index fingertip
/// or mouse). Image x maps to world x and image y to world z, both spanning
/// `cursor_span` grid units centered on the origin.
///
/// The smoothed position is kept unrounded; only the reported position is
/// snapped to the grid, so the cursor always settles on its target.
#[derive(Debug, Clone)]
pub struct CursorTracker {
    smoothing: f32,
    span: f32,
    smoothed: Vec3,
}

impl CursorTracker {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            smoothing: config.cursor_smoothing.clamp(0.0, 1.0),
            span: config.cursor_span,
            smoothed: Vec3::new(0.0, GROUND_LEVEL, 0.0),
        }
    }

    /// Grid-snapped cursor position.
    pub fn position(&self) -> WorldPos {
        Vec3::new(self.smoothed.x.round(), GROUND_LEVEL, self.smoothed.z.round())
    }

    pub fn cell(&self) -> GridCell {
        snap_to_cell(self.position())
    }

    /// Ground-plane grid point under a normalized screen point.
    pub fn screen_to_world(&self, u: f32, v: f32) -> WorldPos {
        Vec3::new(
            ((u - 0.5) * self.span).round(),
            GROUND_LEVEL,
            ((v - 0.5) * self.span).round(),
        )
    }

    /// Move toward a world target by the smoothing factor.
    pub fn track(&mut self, target: WorldPos) -> WorldPos {
        if target.is_finite() {
            let target = Vec3::new(target.x, GROUND_LEVEL, target.z);
            self.smoothed = self.smoothed.lerp(target, self.smoothing);
        }
        self.position()
    }

    /// Follow a normalized screen point (mouse simulation).
    pub fn track_screen(&mut self, u: f32, v: f32) -> WorldPos {
        let target = self.screen_to_world(u, v);
        self.track(target)
    }

    /// Follow the index fingertip.
    pub fn track_hand(&mut self, hand: &HandLandmarks) -> WorldPos {
        let tip = hand.index_tip();
        self.track_screen(tip.x, tip.y)
    }
}
