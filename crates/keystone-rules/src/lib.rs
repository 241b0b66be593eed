pub mod defaults;
pub mod loader;
pub mod validator;

pub use defaults::{builtin_materials, material_or_default, COLOR_PALETTE};
pub use loader::LoadError;
