pub mod config;
pub mod constants;
pub mod cube;
pub mod direction;
pub mod error;
pub mod material;
pub mod math;
pub mod types;
