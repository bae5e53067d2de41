//! Disassembler errors

use channel_spec::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisassemblerError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unknown account kind: {0}")]
    UnknownAccountKind(String),
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
