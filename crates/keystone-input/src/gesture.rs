//! Hand-pose classification from the 21 landmarks of a hand tracker.
//!
//! Landmarks are in normalized image coordinates: x to the right, y
//! downward, both in 0..1. Only x and y take part in the distances; z is
//! carried but ignored. Finger extension is judged against the palm size
//! (wrist to middle knuckle), which does not change as fingers curl.

use glam::{Vec2, Vec3};
use keystone_core::config::GestureConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Thumb tip to index knuckle distance, in palm sizes, beyond which the
/// thumb counts as extended.
const THUMB_SPREAD_RATIO: f32 = 0.6;

/// Vertical thumb offset from the wrist, in palm sizes, for a thumbs up/down.
const THUMB_VERTICAL_RATIO: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    #[error("expected 21 hand landmarks, got {0}")]
    WrongCount(usize),
}

/// One tracked hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks(pub [Vec3; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn from_slice(points: &[Vec3]) -> Result<Self, LandmarkError> {
        let points: [Vec3; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        Ok(Self(points))
    }

    /// Landmark by index, `None` past the 21 tracked points.
    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.0.get(index).copied()
    }

    /// Tip of the index finger, which drives the cursor.
    pub fn index_tip(&self) -> Vec3 {
        self.0[INDEX_TIP]
    }

    fn planar(&self, index: usize) -> Vec2 {
        self.0[index].truncate()
    }

    fn distance(&self, a: usize, b: usize) -> f32 {
        self.planar(a).distance(self.planar(b))
    }

    /// Wrist to middle knuckle.
    pub fn palm_size(&self) -> f32 {
        self.distance(WRIST, MIDDLE_MCP)
    }

    /// Thumb tip to index tip.
    pub fn pinch_distance(&self) -> f32 {
        self.distance(THUMB_TIP, INDEX_TIP)
    }

    pub fn fingers(&self, config: &GestureConfig) -> FingerState {
        let reach = 2.0 * self.palm_size() * config.open_palm_ratio;
        let extended = |tip: usize| self.distance(WRIST, tip) > reach;
        FingerState {
            thumb: self.distance(THUMB_TIP, INDEX_MCP) > THUMB_SPREAD_RATIO * self.palm_size(),
            index: extended(INDEX_TIP),
            middle: extended(MIDDLE_TIP),
            ring: extended(RING_TIP),
            pinky: extended(PINKY_TIP),
        }
    }
}

/// Which fingers are extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

/// Recognized hand pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pose {
    /// No hand, or nothing recognizable.
    #[default]
    Idle,
    /// Index finger only.
    Point,
    Fist,
    /// Index through pinky extended.
    OpenPalm,
    /// Index and middle extended.
    RotatePose,
    /// Thumb tip touching index tip.
    Pinch,
    ThumbsUp,
    ThumbsDown,
}

impl Pose {
    pub fn name(self) -> &'static str {
        match self {
            Pose::Idle => "idle",
            Pose::Point => "point",
            Pose::Fist => "fist",
            Pose::OpenPalm => "open_palm",
            Pose::RotatePose => "rotate",
            Pose::Pinch => "pinch",
            Pose::ThumbsUp => "thumbs_up",
            Pose::ThumbsDown => "thumbs_down",
        }
    }
}

/// Classify a hand. Pinch wins over finger patterns, provided the index
/// tip reaches past its knuckle (a fist also brings the thumb near the
/// index tip).
pub fn classify(hand: &HandLandmarks, config: &GestureConfig) -> Pose {
    let palm = hand.palm_size();
    if !palm.is_finite() || palm <= f32::EPSILON {
        return Pose::Idle;
    }

    let index_reaches = hand.distance(WRIST, INDEX_TIP) > hand.distance(WRIST, INDEX_MCP);
    if hand.pinch_distance() < config.pinch_distance && index_reaches {
        return Pose::Pinch;
    }

    let f = hand.fingers(config);
    match (f.thumb, f.index, f.middle, f.ring, f.pinky) {
        (_, true, true, true, true) => Pose::OpenPalm,
        (_, true, true, false, false) => Pose::RotatePose,
        (_, true, false, false, false) => Pose::Point,
        (false, false, false, false, false) => Pose::Fist,
        (true, false, false, false, false) => {
            // Image y grows downward
            let rise = hand.0[WRIST].y - hand.0[THUMB_TIP].y;
            if rise > THUMB_VERTICAL_RATIO * palm {
                Pose::ThumbsUp
            } else if rise < -THUMB_VERTICAL_RATIO * palm {
                Pose::ThumbsDown
            } else {
                Pose::Idle
            }
        }
        _ => Pose::Idle,
    }
}
