use crate::constants::{COLLAPSE_COUNTDOWN_START, COLLAPSE_TICK_MS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What undoing a confirm does to the collapse warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UndoConfirmPolicy {
    /// Clear the warning outright, even if older confirmed cubes are still
    /// unsupported.
    #[default]
    ClearWarning,
    /// Re-run the support analysis over the remaining confirmed cubes.
    Recompute,
}

/// Tunables for the structure engine, loaded from `data/config/engine.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Countdown value (seconds) when a collapse warning is raised.
    pub countdown_start: u32,
    /// Real-time length of one countdown step.
    pub tick_interval_ms: u64,
    pub undo_confirm: UndoConfirmPolicy,
    /// Material selected when the store starts.
    pub default_material: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            countdown_start: COLLAPSE_COUNTDOWN_START,
            tick_interval_ms: COLLAPSE_TICK_MS,
            undo_confirm: UndoConfirmPolicy::default(),
            default_material: "Steel".into(),
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Thresholds for hand-pose classification and gesture mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb-tip to index-tip distance (normalized image units) below which a pinch is detected.
    pub pinch_distance: f32,
    /// A finger counts as extended when its tip is farther from the wrist than
    /// this fraction of the hand length (twice the wrist-to-middle-knuckle distance).
    pub open_palm_ratio: f32,
    /// Exponential smoothing factor for the cursor (0 = frozen, 1 = raw).
    pub cursor_smoothing: f32,
    /// Width in grid units that the full camera frame maps onto.
    pub cursor_span: f32,
    /// Consecutive frames a pose must hold before it triggers an action.
    pub stable_frames: u32,
    /// Palm-size ratio change that emits one zoom step.
    pub zoom_ratio: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_distance: 0.05,
            open_palm_ratio: 0.7,
            cursor_smoothing: 0.3,
            cursor_span: 10.0,
            stable_frames: 3,
            zoom_ratio: 1.15,
        }
    }
}
