pub mod cursor;
pub mod gesture;
pub mod keys;
pub mod mapping;

pub use cursor::CursorTracker;
pub use gesture::{classify, HandLandmarks, Pose};
pub use keys::{Key, KeyBinding, KeyEvent};
pub use mapping::{GestureAction, GestureMapper};

use keystone_core::config::GestureConfig;
use keystone_core::types::WorldPos;
use keystone_rules::loader::load_gesture_config;
use keystone_sim::{ActionRequest, KeystoneError};
use std::path::Path;

/// Output of one input frame.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFrame {
    pub cursor: WorldPos,
    pub pose: Pose,
    pub actions: Vec<GestureAction>,
}

impl InputFrame {
    /// Store requests for the structure actions of this frame, in order.
    pub fn requests(&self) -> Vec<ActionRequest> {
        self.actions
            .iter()
            .filter_map(|a| a.to_request(self.cursor))
            .collect()
    }

    /// Camera actions for the host, in order.
    pub fn camera_actions(&self) -> impl Iterator<Item = GestureAction> + '_ {
        self.actions.iter().copied().filter(|a| a.is_camera())
    }
}

/// Cursor, pose mapping and keyboard fallback for one user.
///
/// With a camera, call `on_hand` once per tracker frame. Without one, feed
/// `on_pointer` and `on_key`, then call `on_keyboard_frame` once per frame
/// so held pose keys go through the same debounce as real poses.
pub struct GestureSession {
    config: GestureConfig,
    cursor: CursorTracker,
    mapper: GestureMapper,
    held_pose: Option<Pose>,
}

impl GestureSession {
    pub fn new(config: GestureConfig) -> Self {
        let cursor = CursorTracker::new(&config);
        let mapper = GestureMapper::new(&config);
        Self {
            config,
            cursor,
            mapper,
            held_pose: None,
        }
    }

    /// Load `config/gesture.ron` from a data directory.
    pub fn from_data_dir(dir: &Path) -> Result<Self, KeystoneError> {
        let path = dir.join("config").join("gesture.ron");
        let source = std::fs::read_to_string(&path)
            .map_err(|source| KeystoneError::Io { path, source })?;
        let config = load_gesture_config(&source)?;
        log::info!("Gesture config loaded from {}", dir.display());
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn cursor(&self) -> WorldPos {
        self.cursor.position()
    }

    pub fn pose(&self) -> Pose {
        self.mapper.active()
    }

    /// One tracker frame. `None` means no hand was detected.
    pub fn on_hand(&mut self, hand: Option<&HandLandmarks>) -> InputFrame {
        let actions = match hand {
            Some(hand) => {
                self.cursor.track_hand(hand);
                let pose = classify(hand, &self.config);
                self.mapper.observe(pose, hand.palm_size())
            }
            None => self.mapper.observe(Pose::Idle, 0.0),
        };
        self.frame(actions)
    }

    /// Normalized pointer position (0..1 on both axes).
    pub fn on_pointer(&mut self, u: f32, v: f32) -> WorldPos {
        self.cursor.track_screen(u, v)
    }

    /// Key press or release. Action keys fire on press and bypass the
    /// debounce; pose keys are held until released.
    pub fn on_key(&mut self, event: KeyEvent, pressed: bool) -> Vec<GestureAction> {
        match keys::binding(event) {
            Some(KeyBinding::Action(action)) if pressed => {
                log::debug!("Key {:?} -> {action:?}", event.key);
                vec![action]
            }
            Some(KeyBinding::Pose(pose)) => {
                if pressed {
                    self.held_pose = Some(pose);
                } else if self.held_pose == Some(pose) {
                    self.held_pose = None;
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// One frame of keyboard simulation.
    pub fn on_keyboard_frame(&mut self) -> InputFrame {
        let pose = self.held_pose.unwrap_or_default();
        let actions = self.mapper.observe(pose, 0.0);
        self.frame(actions)
    }

    /// Drop the current pose, e.g. when tracking is lost for good.
    pub fn reset(&mut self) -> InputFrame {
        self.held_pose = None;
        let actions = self.mapper.reset();
        self.frame(actions)
    }

    fn frame(&self, actions: Vec<GestureAction>) -> InputFrame {
        for action in &actions {
            log::info!("Gesture action {action:?}");
        }
        InputFrame {
            cursor: self.cursor.position(),
            pose: self.mapper.active(),
            actions,
        }
    }
}
