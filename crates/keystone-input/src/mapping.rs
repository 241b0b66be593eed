//! Turning a stream of per-frame poses into discrete actions.
//!
//! A pose must be seen for `stable_frames` consecutive frames before it
//! takes effect, and it acts once on entry (edge triggered). Holding a
//! pinch places one cube, not one per frame.

use crate::gesture::Pose;
use keystone_core::config::GestureConfig;
use keystone_core::types::WorldPos;
use keystone_sim::ActionRequest;
use serde::{Deserialize, Serialize};

/// What the user asked for with a gesture or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureAction {
    Place,
    Delete,
    Confirm,
    Undo,
    CancelCollapse,
    RotateStart,
    RotateEnd,
    ZoomIn,
    ZoomOut,
}

impl GestureAction {
    /// Camera actions are handled by the host and never reach the store.
    pub fn is_camera(self) -> bool {
        matches!(
            self,
            GestureAction::RotateStart
                | GestureAction::RotateEnd
                | GestureAction::ZoomIn
                | GestureAction::ZoomOut
        )
    }

    /// Store request for this action with the cursor at `cursor`.
    pub fn to_request(self, cursor: WorldPos) -> Option<ActionRequest> {
        match self {
            GestureAction::Place => Some(ActionRequest::PlaceDraft {
                position: cursor,
                material: None,
            }),
            GestureAction::Delete => Some(ActionRequest::DeleteAt { position: cursor }),
            GestureAction::Confirm => Some(ActionRequest::ConfirmDraft),
            GestureAction::Undo => Some(ActionRequest::Undo),
            GestureAction::CancelCollapse => Some(ActionRequest::CancelCollapse),
            GestureAction::RotateStart
            | GestureAction::RotateEnd
            | GestureAction::ZoomIn
            | GestureAction::ZoomOut => None,
        }
    }

    /// Action fired on entering `pose`, if any.
    pub fn on_enter(pose: Pose) -> Option<Self> {
        match pose {
            Pose::Pinch => Some(GestureAction::Place),
            Pose::Fist => Some(GestureAction::Delete),
            Pose::OpenPalm => Some(GestureAction::Confirm),
            Pose::ThumbsDown => Some(GestureAction::Undo),
            Pose::ThumbsUp => Some(GestureAction::CancelCollapse),
            Pose::RotatePose => Some(GestureAction::RotateStart),
            Pose::Idle | Pose::Point => None,
        }
    }
}

/// Debounced, edge-triggered pose to action mapping.
#[derive(Debug, Clone)]
pub struct GestureMapper {
    stable_frames: u32,
    zoom_ratio: f32,
    candidate: Pose,
    candidate_frames: u32,
    active: Pose,
    /// Palm size at the last zoom step while the open palm is held.
    zoom_anchor: Option<f32>,
}

impl GestureMapper {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            stable_frames: config.stable_frames.max(1),
            zoom_ratio: config.zoom_ratio.max(1.0 + f32::EPSILON),
            candidate: Pose::Idle,
            candidate_frames: 0,
            active: Pose::Idle,
            zoom_anchor: None,
        }
    }

    /// The debounced pose currently in effect.
    pub fn active(&self) -> Pose {
        self.active
    }

    /// Feed one frame's pose and palm size. Returns the actions it triggers.
    pub fn observe(&mut self, pose: Pose, palm_size: f32) -> Vec<GestureAction> {
        if pose == self.candidate {
            self.candidate_frames = self.candidate_frames.saturating_add(1);
        } else {
            self.candidate = pose;
            self.candidate_frames = 1;
        }

        let mut actions = Vec::new();
        if self.candidate != self.active && self.candidate_frames >= self.stable_frames {
            let previous = std::mem::replace(&mut self.active, self.candidate);
            log::debug!("Pose {} -> {}", previous.name(), self.active.name());
            if previous == Pose::RotatePose {
                actions.push(GestureAction::RotateEnd);
            }
            actions.extend(GestureAction::on_enter(self.active));
            self.zoom_anchor = (self.active == Pose::OpenPalm && palm_size > 0.0).then_some(palm_size);
        } else if self.active == Pose::OpenPalm && pose == Pose::OpenPalm {
            actions.extend(self.zoom_step(palm_size));
        }
        actions
    }

    /// Forget any pose in progress. Ends a rotation if one was running.
    pub fn reset(&mut self) -> Vec<GestureAction> {
        let previous = std::mem::take(&mut self.active);
        self.candidate = Pose::Idle;
        self.candidate_frames = 0;
        self.zoom_anchor = None;
        if previous == Pose::RotatePose {
            vec![GestureAction::RotateEnd]
        } else {
            Vec::new()
        }
    }

    fn zoom_step(&mut self, palm_size: f32) -> Option<GestureAction> {
        let anchor = self.zoom_anchor?;
        let action = if palm_size >= anchor * self.zoom_ratio {
            GestureAction::ZoomIn
        } else if palm_size <= anchor / self.zoom_ratio {
            GestureAction::ZoomOut
        } else {
            return None;
        };
        self.zoom_anchor = Some(palm_size);
        Some(action)
    }
}
