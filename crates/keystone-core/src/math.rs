use crate::constants::{GRID_EPSILON, GRID_LIMIT, GROUND_LAYER, GROUND_LEVEL};
use crate::error::Rejection;
use crate::types::{GridCell, WorldPos};
use glam::{IVec3, Vec3};

/// World-space center of a grid cell.
pub fn cell_to_world(cell: GridCell) -> WorldPos {
    Vec3::new(cell.x as f32, cell.y as f32 + GROUND_LEVEL, cell.z as f32)
}

/// Whether every coordinate of `cell` lies within `GRID_LIMIT`.
pub fn cell_in_bounds(cell: GridCell) -> bool {
    let limit = GRID_LIMIT.unsigned_abs();
    cell.x.unsigned_abs() <= limit
        && cell.y.unsigned_abs() <= limit
        && cell.z.unsigned_abs() <= limit
}

/// Convert a world-space cube center to its grid cell.
///
/// x and z must be integers and y a half-integer (ground = 0.5), within
/// `GRID_EPSILON`. Cells below the ground plane or beyond `GRID_LIMIT`
/// are refused.
pub fn world_to_cell(pos: WorldPos) -> Result<GridCell, Rejection> {
    let off_grid = Rejection::OffGrid {
        x: pos.x,
        y: pos.y,
        z: pos.z,
    };
    if !pos.is_finite() {
        return Err(off_grid);
    }

    let layer = pos.y - GROUND_LEVEL;
    let rounded = Vec3::new(pos.x.round(), layer.round(), pos.z.round());
    let drift = (Vec3::new(pos.x, layer, pos.z) - rounded).abs();
    if drift.max_element() > GRID_EPSILON {
        return Err(off_grid);
    }

    if rounded.abs().max_element() > GRID_LIMIT as f32 {
        return Err(Rejection::OutOfBounds {
            x: pos.x,
            y: pos.y,
            z: pos.z,
        });
    }

    let cell = IVec3::new(rounded.x as i32, rounded.y as i32, rounded.z as i32);
    if cell.y < GROUND_LAYER {
        return Err(Rejection::BelowGround { layer: cell.y });
    }
    Ok(cell)
}

/// Snap an arbitrary world position to the nearest cell at or above ground.
/// Used for cursors, which never carry exact grid positions. The result is
/// clamped into `GRID_LIMIT`.
pub fn snap_to_cell(pos: WorldPos) -> GridCell {
    let layer = (pos.y - GROUND_LEVEL).round() as i32;
    IVec3::new(
        (pos.x.round() as i32).clamp(-GRID_LIMIT, GRID_LIMIT),
        layer.clamp(GROUND_LAYER, GRID_LIMIT),
        (pos.z.round() as i32).clamp(-GRID_LIMIT, GRID_LIMIT),
    )
}
