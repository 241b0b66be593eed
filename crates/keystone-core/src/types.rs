use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for cube identifiers. Issued monotonically by the structure store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct CubeId(pub u64);

impl fmt::Display for CubeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer grid cell. `y` is the layer index, 0 = resting on the ground.
pub type GridCell = IVec3;

/// World-space position of a cube center.
pub type WorldPos = Vec3;

/// Kind of a recorded history entry, used when reporting undo refusals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTag {
    Place,
    DeleteDraft,
    DeleteConfirmed,
    ConfirmDraft,
    Collapse,
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionTag::Place => "PLACE_DRAFT",
            ActionTag::DeleteDraft => "DELETE_DRAFT",
            ActionTag::DeleteConfirmed => "DELETE_CONFIRMED",
            ActionTag::ConfirmDraft => "CONFIRM_DRAFT",
            ActionTag::Collapse => "COLLAPSE",
        };
        f.write_str(name)
    }
}
