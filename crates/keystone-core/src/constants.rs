//! Single source of truth for shared constants.
//! Grid layers are integers; world-space cube centers sit half a unit
//! above their layer so a ground cube rests on the y=0 plane.

/// World-space y of a cube center resting on the ground plane.
pub const GROUND_LEVEL: f32 = 0.5;

/// Grid layer of a ground-level cube.
pub const GROUND_LAYER: i32 = 0;

/// First id issued by a fresh structure store.
pub const FIRST_CUBE_ID: u64 = 1;

/// Seconds shown when a collapse warning is raised.
pub const COLLAPSE_COUNTDOWN_START: u32 = 3;

/// Real-time length of one countdown step, in milliseconds.
pub const COLLAPSE_TICK_MS: u64 = 1000;

/// Largest absolute grid coordinate a cube may occupy on any axis. Kept
/// far inside both the i32 range and the exactly representable f32
/// half-integers so neighbour steps and world conversions never overflow.
pub const GRID_LIMIT: i32 = 1 << 20;

/// Tolerance when checking that a world position lies on the grid.
pub const GRID_EPSILON: f32 = 1e-3;

/// Density assigned to materials created from a bare color (kg/m³).
pub const CUSTOM_DENSITY: f32 = 1000.0;

/// Strength assigned to materials created from a bare color (MPa).
pub const CUSTOM_STRENGTH: f32 = 50.0;

/// Brightness shift (percent) applied to a custom color to derive its emissive tint.
pub const CUSTOM_EMISSIVE_SHIFT: f32 = -30.0;
