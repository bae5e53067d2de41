//! Assembler errors

use channel_spec::{BuildError, ConfigError, DerivationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
