//! Ground-support analysis for confirmed cubes.
//!
//! A confirmed cube is supported if a chain of face-adjacent cubes connects
//! it to a cube resting on the ground (layer 0). Everything else is
//! unstable and becomes a candidate for collapse.
//!
//! Only geometric connectivity matters. Material density and strength are
//! not consulted, and edge (diagonal) contact is not support.
//!
//! The search is a BFS seeded from every grounded cube over a spatial hash
//! keyed by grid cell, so it runs in O(n) on average. `analyze_pairwise`
//! is the O(n²) form built directly on `is_support_adjacent`; both must
//! agree on every input.

use keystone_core::cube::Cube;
use keystone_core::direction::face_neighbors;
use keystone_core::types::{CubeId, GridCell};
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Partition of a cube set into supported and unstable ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilityReport {
    pub supported: BTreeSet<CubeId>,
    pub unstable: BTreeSet<CubeId>,
}

impl StabilityReport {
    /// Whether every analyzed cube is supported.
    pub fn is_stable(&self) -> bool {
        self.unstable.is_empty()
    }

    fn from_visited(cubes: &[Cube], visited: &[bool]) -> Self {
        let mut report = Self::default();
        for (cube, &reached) in cubes.iter().zip(visited) {
            if reached {
                report.supported.insert(cube.id);
            } else {
                report.unstable.insert(cube.id);
            }
        }
        report
    }
}

/// Whether two cells share a face: exactly one axis differs, by exactly 1.
pub fn cells_share_face(a: GridCell, b: GridCell) -> bool {
    let axis = |p: i32, q: i32| (i64::from(p) - i64::from(q)).abs();
    axis(a.x, b.x) + axis(a.y, b.y) + axis(a.z, b.z) == 1
}

/// Whether `b` can carry load from `a` (symmetric). A cube is never
/// adjacent to itself.
pub fn is_support_adjacent(a: &Cube, b: &Cube) -> bool {
    a.id != b.id && cells_share_face(a.cell, b.cell)
}

/// Classify every cube as supported or unstable.
///
/// Pure and deterministic: the input is not modified and the result does
/// not depend on input order.
pub fn analyze(cubes: &[Cube]) -> StabilityReport {
    if cubes.is_empty() {
        return StabilityReport::default();
    }

    // Cells can only hold one live cube, but the analysis is total over any input.
    let mut by_cell: HashMap<GridCell, Vec<usize>> = HashMap::with_capacity(cubes.len());
    for (i, cube) in cubes.iter().enumerate() {
        by_cell.entry(cube.cell).or_default().push(i);
    }

    let mut visited = vec![false; cubes.len()];
    let mut queue = VecDeque::new();

    for (i, cube) in cubes.iter().enumerate() {
        if cube.is_grounded() {
            visited[i] = true;
            queue.push_back(i);
        }
    }

    while let Some(current) = queue.pop_front() {
        for neighbor in face_neighbors(cubes[current].cell) {
            let Some(indices) = by_cell.get(&neighbor) else {
                continue;
            };
            for &j in indices {
                if !visited[j] {
                    visited[j] = true;
                    queue.push_back(j);
                }
            }
        }
    }

    StabilityReport::from_visited(cubes, &visited)
}

/// Reference O(n²) analysis: precompute the full adjacency lists with
/// `is_support_adjacent`, then BFS from the grounded cubes.
pub fn analyze_pairwise(cubes: &[Cube]) -> StabilityReport {
    if cubes.is_empty() {
        return StabilityReport::default();
    }

    let adjacency: Vec<Vec<usize>> = cubes
        .iter()
        .map(|a| {
            cubes
                .iter()
                .enumerate()
                .filter(|(_, b)| is_support_adjacent(a, b))
                .map(|(j, _)| j)
                .collect()
        })
        .collect();

    let mut visited: Vec<bool> = cubes.iter().map(Cube::is_grounded).collect();
    let mut queue: VecDeque<usize> = (0..cubes.len()).filter(|&i| visited[i]).collect();

    while let Some(current) = queue.pop_front() {
        for &j in &adjacency[current] {
            if !visited[j] {
                visited[j] = true;
                queue.push_back(j);
            }
        }
    }

    StabilityReport::from_visited(cubes, &visited)
}

/// Whether every cube has a support path to the ground.
pub fn is_structure_stable(cubes: &[Cube]) -> bool {
    analyze(cubes).is_stable()
}

/// Ids of the cubes with no support path to the ground.
pub fn unstable_ids(cubes: &[Cube]) -> BTreeSet<CubeId> {
    analyze(cubes).unstable
}
