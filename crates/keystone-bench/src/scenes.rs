use glam::IVec3;
use keystone_core::cube::{Cube, CubeStatus};
use keystone_core::types::CubeId;
use keystone_rules::{builtin_materials, material_or_default};
use std::sync::Arc;

/// Shape of a synthetic structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Single column straight up from the ground.
    Tower,
    /// Square floor slab one layer up, carried by a pillar every 4 cells.
    PillaredSlab,
    /// Grounded base with detached blocks hovering above it.
    FloatingIslands,
    /// Sparse pseudo-random fill of a cube, mostly disconnected.
    Lattice,
}

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub kind: SceneKind,
    pub target_cubes: u32,
}

/// Return the standard suite of benchmark scenes (1K to 100K cubes).
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "tower-1K",
            kind: SceneKind::Tower,
            target_cubes: 1_000,
        },
        SceneConfig {
            name: "slab-10K",
            kind: SceneKind::PillaredSlab,
            target_cubes: 10_000,
        },
        SceneConfig {
            name: "islands-10K",
            kind: SceneKind::FloatingIslands,
            target_cubes: 10_000,
        },
        SceneConfig {
            name: "lattice-50K",
            kind: SceneKind::Lattice,
            target_cubes: 50_000,
        },
        SceneConfig {
            name: "slab-100K",
            kind: SceneKind::PillaredSlab,
            target_cubes: 100_000,
        },
    ]
}

/// Confirmed cubes for a scene, ids from 1 in generation order. Cells are
/// unique. The count may fall slightly short of the target where the shape
/// cannot be filled exactly.
pub fn generate_scene(config: &SceneConfig) -> Vec<Cube> {
    let target = config.target_cubes as usize;
    let cells = match config.kind {
        SceneKind::Tower => tower(target),
        SceneKind::PillaredSlab => pillared_slab(target),
        SceneKind::FloatingIslands => floating_islands(target),
        SceneKind::Lattice => lattice(target),
    };

    let material = Arc::new(material_or_default(&builtin_materials(), "Concrete"));
    cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            Cube::new(
                CubeId(i as u64 + 1),
                cell,
                material.clone(),
                CubeStatus::Confirmed,
            )
        })
        .collect()
}

fn tower(count: usize) -> Vec<IVec3> {
    (0..count as i32).map(|y| IVec3::new(0, y, 0)).collect()
}

fn pillared_slab(count: usize) -> Vec<IVec3> {
    // side^2 slab cells + (side/4)^2 pillars ~= 1.0625 side^2
    let side = ((count as f64 / 1.0625).sqrt().floor() as i32).max(1);
    let mut cells = Vec::with_capacity(count);
    for x in (0..side).step_by(4) {
        for z in (0..side).step_by(4) {
            cells.push(IVec3::new(x, 0, z));
        }
    }
    for x in 0..side {
        for z in 0..side {
            if cells.len() >= count {
                return cells;
            }
            cells.push(IVec3::new(x, 1, z));
        }
    }
    cells
}

fn floating_islands(count: usize) -> Vec<IVec3> {
    // Half the cubes form a ground slab, the rest 4x4x4 blocks at layer 5+
    let base = count / 2;
    let side = ((base as f64).sqrt().ceil() as i32).max(1);
    let mut cells = Vec::with_capacity(count);
    'base: for x in 0..side {
        for z in 0..side {
            if cells.len() >= base {
                break 'base;
            }
            cells.push(IVec3::new(x, 0, z));
        }
    }

    let mut island = 0;
    while cells.len() < count {
        let origin = IVec3::new((island % 16) * 6, 5 + (island / 256) * 6, ((island / 16) % 16) * 6);
        for dx in 0..4 {
            for dy in 0..4 {
                for dz in 0..4 {
                    if cells.len() >= count {
                        return cells;
                    }
                    cells.push(origin + IVec3::new(dx, dy, dz));
                }
            }
        }
        island += 1;
    }
    cells
}

fn lattice(count: usize) -> Vec<IVec3> {
    // Fill roughly a third of a cube of side n
    let side = ((count as f64 * 3.0).cbrt().ceil() as i32).max(1);
    let mut cells = Vec::with_capacity(count);
    let mut i: u32 = 0;
    while cells.len() < count {
        let x = (i % side as u32) as i32;
        let y = ((i / side as u32) % side as u32) as i32;
        let z = (i / (side as u32 * side as u32)) as i32;
        if z >= side {
            break;
        }
        // Deterministic pseudo-random selection based on position
        let hash = (i.wrapping_mul(2_654_435_761) >> 16) % 3;
        if hash == 0 {
            cells.push(IVec3::new(x, y, z));
        }
        i += 1;
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn scene(kind: SceneKind, target_cubes: u32) -> Vec<Cube> {
        generate_scene(&SceneConfig {
            name: "test",
            kind,
            target_cubes,
        })
    }

    #[test]
    fn test_cells_unique_and_above_ground() {
        for kind in [
            SceneKind::Tower,
            SceneKind::PillaredSlab,
            SceneKind::FloatingIslands,
            SceneKind::Lattice,
        ] {
            let cubes = scene(kind, 3_000);
            assert!(!cubes.is_empty(), "{kind:?}");
            assert!(cubes.len() <= 3_000, "{kind:?}");
            let cells: HashSet<IVec3> = cubes.iter().map(|c| c.cell).collect();
            assert_eq!(cells.len(), cubes.len(), "{kind:?} has duplicate cells");
            assert!(cubes.iter().all(|c| c.cell.y >= 0), "{kind:?}");
        }
    }

    #[test]
    fn test_tower_exact() {
        let cubes = scene(SceneKind::Tower, 50);
        assert_eq!(cubes.len(), 50);
        assert_eq!(cubes[49].cell, IVec3::new(0, 49, 0));
        assert_eq!(cubes[49].id, CubeId(50));
    }

    #[test]
    fn test_islands_half_grounded() {
        let cubes = scene(SceneKind::FloatingIslands, 1_000);
        assert_eq!(cubes.len(), 1_000);
        let grounded = cubes.iter().filter(|c| c.is_grounded()).count();
        assert_eq!(grounded, 500);
    }

    #[test]
    fn test_deterministic() {
        let a = scene(SceneKind::Lattice, 2_000);
        let b = scene(SceneKind::Lattice, 2_000);
        assert_eq!(a, b);
    }
}
