use crate::gesture::Pose;
use crate::mapping::GestureAction;

/// Keys the fallback bindings care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Space,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    pub fn ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }
}

/// What a key does when no camera is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    /// Simulate a hand pose while the key is held.
    Pose(Pose),
    /// Fire an action on press.
    Action(GestureAction),
}

/// P pinch, O open palm, F fist, Space place, Ctrl+Z undo, Enter confirm,
/// Esc cancel collapse.
pub fn binding(event: KeyEvent) -> Option<KeyBinding> {
    let binding = match (event.key, event.ctrl) {
        (Key::Char(c), true) if c.eq_ignore_ascii_case(&'z') => {
            KeyBinding::Action(GestureAction::Undo)
        }
        (_, true) => return None,
        (Key::Char(c), false) => match c.to_ascii_lowercase() {
            'p' => KeyBinding::Pose(Pose::Pinch),
            'o' => KeyBinding::Pose(Pose::OpenPalm),
            'f' => KeyBinding::Pose(Pose::Fist),
            _ => return None,
        },
        (Key::Space, false) => KeyBinding::Action(GestureAction::Place),
        (Key::Enter, false) => KeyBinding::Action(GestureAction::Confirm),
        (Key::Escape, false) => KeyBinding::Action(GestureAction::CancelCollapse),
    };
    Some(binding)
}
