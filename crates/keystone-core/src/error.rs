use crate::math::cell_to_world;
use crate::types::{ActionTag, CubeId, GridCell};
use thiserror::Error;

/// Reasons a structure transition was refused. A refused transition leaves
/// the store exactly as it was and is not recorded in history.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("cell {cell} is already occupied")]
    Occupied { cell: GridCell },

    #[error("position ({x}, {y}, {z}) is not aligned to the cube grid")]
    OffGrid { x: f32, y: f32, z: f32 },

    #[error("position ({x}, {y}, {z}) is outside the buildable area")]
    OutOfBounds { x: f32, y: f32, z: f32 },

    #[error("layer {layer} is below the ground plane")]
    BelowGround { layer: i32 },

    #[error("no draft cube with id {0}")]
    UnknownDraft(CubeId),

    #[error("no confirmed cube with id {0}")]
    UnknownConfirmed(CubeId),

    #[error("no live cube with id {0}")]
    UnknownCube(CubeId),

    #[error("no cube at cell {cell}")]
    EmptyCell { cell: GridCell },

    #[error("there are no draft cubes to confirm")]
    NoDrafts,

    #[error("history is empty")]
    HistoryEmpty,

    #[error("{0} cannot be undone")]
    NotUndoable(ActionTag),

    #[error("no collapse warning is active")]
    NoActiveWarning,

    #[error("history entry for cube {0} no longer matches the drafts")]
    HistoryMismatch(CubeId),
}

impl Rejection {
    /// Out-of-bounds refusal for a grid cell, reported at its world position.
    pub fn out_of_bounds(cell: GridCell) -> Self {
        let pos = cell_to_world(cell);
        Rejection::OutOfBounds {
            x: pos.x,
            y: pos.y,
            z: pos.z,
        }
    }
}
