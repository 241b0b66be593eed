use crate::constants::{CUSTOM_DENSITY, CUSTOM_EMISSIVE_SHIFT, CUSTOM_STRENGTH};
use serde::{Deserialize, Serialize};

/// RGB color with channels in 0.0–1.0.
pub type Rgb = (f32, f32, f32);

/// A building material. The structure engine only stores and propagates
/// it; none of these properties affect the stability decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Display name, also the lookup key (case-insensitive).
    pub name: String,
    /// Base color (0.0–1.0 per channel).
    pub color: Rgb,
    /// Emissive tint used for highlighting.
    #[serde(default)]
    pub emissive: Rgb,
    /// Density in kg/m³.
    pub density: f32,
    /// Yield strength in MPa.
    pub strength: f32,
    /// Relative weight used by renderers and HUDs.
    #[serde(default = "default_weight_factor")]
    pub weight_factor: f32,
}

fn default_weight_factor() -> f32 {
    1.0
}

impl MaterialDef {
    /// Build a "Custom" material from a hex color such as `#3b82f6`.
    /// Returns None if the string is not a 6-digit hex color.
    pub fn custom(hex: &str) -> Option<Self> {
        let color = parse_hex_color(hex)?;
        Some(Self {
            name: "Custom".into(),
            color,
            emissive: adjust_brightness(color, CUSTOM_EMISSIVE_SHIFT),
            density: CUSTOM_DENSITY,
            strength: CUSTOM_STRENGTH,
            weight_factor: 1.0,
        })
    }
}

/// Parse `#rrggbb` (leading `#` optional) into an `Rgb`.
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    let channel = |shift: u32| ((value >> shift) & 0xFF) as f32 / 255.0;
    Some((channel(16), channel(8), channel(0)))
}

/// Shift every channel by `percent` of full scale, clamped to 0.0–1.0.
pub fn adjust_brightness(color: Rgb, percent: f32) -> Rgb {
    let amt = percent / 100.0;
    (
        (color.0 + amt).clamp(0.0, 1.0),
        (color.1 + amt).clamp(0.0, 1.0),
        (color.2 + amt).clamp(0.0, 1.0),
    )
}

/// Ordered collection of material definitions.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    pub materials: Vec<MaterialDef>,
}

impl MaterialTable {
    /// Look up a material by name, ignoring case. Returns None if not found.
    pub fn get(&self, name: &str) -> Option<&MaterialDef> {
        self.materials
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
