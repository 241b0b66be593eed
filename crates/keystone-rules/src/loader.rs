use keystone_core::config::{EngineConfig, GestureConfig};
use keystone_core::material::{MaterialDef, MaterialTable};
use thiserror::Error;

use crate::validator::{validate_engine_config, validate_materials, ValidationError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse materials RON: {0}")]
    MaterialParseError(String),
    #[error("Failed to parse engine config RON: {0}")]
    EngineConfigParseError(String),
    #[error("Failed to parse gesture config RON: {0}")]
    GestureConfigParseError(String),
    #[error("Loaded data failed validation ({} problems)", .0.len())]
    Invalid(Vec<ValidationError>),
}

/// Parse a single materials RON string into a MaterialTable.
pub fn load_materials_from_str(ron_str: &str) -> Result<MaterialTable, LoadError> {
    let options = ron::Options::default();
    let materials: Vec<MaterialDef> = options
        .from_str(ron_str)
        .map_err(|e| LoadError::MaterialParseError(e.to_string()))?;
    Ok(MaterialTable { materials })
}

/// Load and merge multiple material sources into a single MaterialTable.
pub fn load_all_materials(sources: &[&str]) -> Result<MaterialTable, LoadError> {
    let mut all_materials = Vec::new();
    for source in sources {
        let table = load_materials_from_str(source)?;
        all_materials.extend(table.materials);
    }
    Ok(MaterialTable {
        materials: all_materials,
    })
}

/// Load and merge material sources, then validate the merged table.
pub fn load_validated_materials(sources: &[&str]) -> Result<MaterialTable, LoadError> {
    let table = load_all_materials(sources)?;
    validate_materials(&table).map_err(LoadError::Invalid)?;
    log::info!("Loaded {} materials", table.len());
    Ok(table)
}

/// Parse and validate an engine config. Missing fields take their defaults.
pub fn load_engine_config(ron_str: &str) -> Result<EngineConfig, LoadError> {
    let options = ron::Options::default();
    let config: EngineConfig = options
        .from_str(ron_str)
        .map_err(|e| LoadError::EngineConfigParseError(e.to_string()))?;
    validate_engine_config(&config).map_err(LoadError::Invalid)?;
    Ok(config)
}

/// Parse a gesture config. Missing fields take their defaults.
pub fn load_gesture_config(ron_str: &str) -> Result<GestureConfig, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::GestureConfigParseError(e.to_string()))
}
