use crate::constants::GROUND_LAYER;
use crate::material::MaterialDef;
use crate::math::cell_to_world;
use crate::types::{CubeId, GridCell, WorldPos};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle stage of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeStatus {
    /// Placed but not yet committed; individually deletable and undoable.
    Draft,
    /// Part of the permanent structure and subject to stability analysis.
    Confirmed,
}

/// A unit cube at an integer grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub id: CubeId,
    pub cell: GridCell,
    /// Shared material descriptor, opaque to the structure engine.
    pub material: Arc<MaterialDef>,
    pub status: CubeStatus,
}

impl Cube {
    pub fn new(id: CubeId, cell: GridCell, material: Arc<MaterialDef>, status: CubeStatus) -> Self {
        Self {
            id,
            cell,
            material,
            status,
        }
    }

    /// World-space center (ground cubes sit at y = 0.5).
    pub fn position(&self) -> WorldPos {
        cell_to_world(self.cell)
    }

    /// Whether this cube rests directly on the ground plane.
    pub fn is_grounded(&self) -> bool {
        self.cell.y == GROUND_LAYER
    }

    /// The same cube with a different status.
    pub fn with_status(mut self, status: CubeStatus) -> Self {
        self.status = status;
        self
    }
}
