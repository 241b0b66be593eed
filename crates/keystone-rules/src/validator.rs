use keystone_core::config::EngineConfig;
use keystone_core::material::{MaterialTable, Rgb};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duplicate material name '{0}'")]
    DuplicateMaterialName(String),
    #[error("Material '{name}' has non-positive density {value}")]
    NonPositiveDensity { name: String, value: f32 },
    #[error("Material '{name}' has non-positive strength {value}")]
    NonPositiveStrength { name: String, value: f32 },
    #[error("Material '{name}' has a color channel outside 0.0-1.0")]
    ColorOutOfRange { name: String },
    #[error("Material name must not be empty")]
    EmptyName,
    #[error("countdown_start must be at least 1")]
    ZeroCountdown,
    #[error("tick_interval_ms must be at least 1")]
    ZeroTickInterval,
    #[error("default material must not be empty")]
    EmptyDefaultMaterial,
}

fn color_in_range(c: Rgb) -> bool {
    [c.0, c.1, c.2].iter().all(|v| (0.0..=1.0).contains(v))
}

/// Validate a material table. Names are unique case-insensitively since
/// lookups ignore case.
pub fn validate_materials(table: &MaterialTable) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for mat in &table.materials {
        if mat.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName);
            continue;
        }
        if !seen.insert(mat.name.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateMaterialName(mat.name.clone()));
        }
    }

    for mat in &table.materials {
        if mat.density.is_nan() || mat.density <= 0.0 {
            errors.push(ValidationError::NonPositiveDensity {
                name: mat.name.clone(),
                value: mat.density,
            });
        }
        if mat.strength.is_nan() || mat.strength <= 0.0 {
            errors.push(ValidationError::NonPositiveStrength {
                name: mat.name.clone(),
                value: mat.strength,
            });
        }
        if !color_in_range(mat.color) || !color_in_range(mat.emissive) {
            errors.push(ValidationError::ColorOutOfRange {
                name: mat.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate engine tunables.
pub fn validate_engine_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if config.countdown_start == 0 {
        errors.push(ValidationError::ZeroCountdown);
    }
    if config.tick_interval_ms == 0 {
        errors.push(ValidationError::ZeroTickInterval);
    }
    if config.default_material.trim().is_empty() {
        errors.push(ValidationError::EmptyDefaultMaterial);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
