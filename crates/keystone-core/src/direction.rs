use glam::IVec3;
use serde::{Deserialize, Serialize};

/// One of the 6 face directions of a grid cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    East = 4,
    West = 5,
}

/// All 6 face directions, in the fixed order used by the support search.
pub const FACE_DIRECTIONS: [Direction; 6] = [
    Direction::Down,
    Direction::Up,
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

impl Direction {
    /// Offset vector for this direction. Y-up convention: Down = (0,-1,0).
    pub fn offset(self) -> IVec3 {
        match self {
            Direction::Down => IVec3::new(0, -1, 0),
            Direction::Up => IVec3::new(0, 1, 0),
            Direction::North => IVec3::new(0, 0, -1),
            Direction::South => IVec3::new(0, 0, 1),
            Direction::East => IVec3::new(1, 0, 0),
            Direction::West => IVec3::new(-1, 0, 0),
        }
    }

    /// The cell one step from `cell` in this direction, or `None` when the
    /// step leaves the i32 range.
    pub fn step(self, cell: IVec3) -> Option<IVec3> {
        let offset = self.offset();
        Some(IVec3::new(
            cell.x.checked_add(offset.x)?,
            cell.y.checked_add(offset.y)?,
            cell.z.checked_add(offset.z)?,
        ))
    }
}

/// The face-adjacent cells of `cell` that exist in the i32 grid (six
/// everywhere except at the extreme edges).
pub fn face_neighbors(cell: IVec3) -> impl Iterator<Item = IVec3> {
    FACE_DIRECTIONS.into_iter().filter_map(move |d| d.step(cell))
}
