use keystone_rules::LoadError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring up a workshop from data files.
#[derive(Debug, Error)]
pub enum KeystoneError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}
