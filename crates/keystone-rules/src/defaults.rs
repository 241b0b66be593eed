//! Built-in material presets and the custom color palette.
//! Mirrors `data/materials/presets.ron` so a store can start without
//! touching the filesystem.

use keystone_core::material::{MaterialDef, MaterialTable};

/// Palette offered for custom-colored materials.
pub const COLOR_PALETTE: [&str; 27] = [
    "#ef4444", // Red
    "#f97316", // Orange
    "#eab308", // Yellow
    "#84cc16", // Lime
    "#22c55e", // Green
    "#14b8a6", // Teal
    "#06b6d4", // Cyan
    "#0ea5e9", // Sky
    "#3b82f6", // Blue
    "#6366f1", // Indigo
    "#8b5cf6", // Violet
    "#a855f7", // Purple
    "#d946ef", // Fuchsia
    "#ec4899", // Pink
    "#f43f5e", // Rose
    "#ffffff", // White
    "#f8fafc", // Slate 50
    "#f1f5f9", // Slate 100
    "#e2e8f0", // Slate 200
    "#cbd5e1", // Slate 300
    "#94a3b8", // Slate 400
    "#64748b", // Slate 500
    "#475569", // Slate 600
    "#334155", // Slate 700
    "#1e293b", // Slate 800
    "#0f172a", // Slate 900
    "#020617", // Slate 950
];

fn preset(
    name: &str,
    color: (f32, f32, f32),
    emissive: (f32, f32, f32),
    density: f32,
    strength: f32,
    weight_factor: f32,
) -> MaterialDef {
    MaterialDef {
        name: name.into(),
        color,
        emissive,
        density,
        strength,
        weight_factor,
    }
}

/// Steel, Concrete, Wood and Aluminum. Steel comes first and is the default.
pub fn builtin_materials() -> MaterialTable {
    MaterialTable {
        materials: vec![
            preset(
                "Steel",
                (0.580, 0.639, 0.722),
                (0.118, 0.161, 0.231),
                7850.0,
                250.0,
                7.85,
            ),
            preset(
                "Concrete",
                (0.392, 0.455, 0.545),
                (0.200, 0.255, 0.333),
                2400.0,
                30.0,
                2.4,
            ),
            preset(
                "Wood",
                (0.573, 0.251, 0.055),
                (0.271, 0.102, 0.012),
                600.0,
                40.0,
                0.6,
            ),
            preset(
                "Aluminum",
                (0.898, 0.906, 0.922),
                (0.216, 0.255, 0.318),
                2700.0,
                90.0,
                2.7,
            ),
        ],
    }
}

/// Look up `name`, falling back to the first material in the table (or the
/// built-in Steel if the table is empty).
pub fn material_or_default(table: &MaterialTable, name: &str) -> MaterialDef {
    if let Some(found) = table.get(name) {
        return found.clone();
    }
    log::warn!("Unknown material '{}', using default", name);
    table
        .materials
        .first()
        .cloned()
        .unwrap_or_else(|| builtin_materials().materials.remove(0))
}
