//! # Error Types for the Channel Wire Format

use crate::config::ConfigError;
use thiserror::Error;

/// Invalid input handed to a record builder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid {field} length: expected {expected} bytes, found {found} bytes")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Vector too long for a 32-bit length prefix: {0} elements")]
    VectorTooLong(usize),

    #[error("InputSet input {position} does not reference an account: {reason}")]
    InvalidInputSet { position: usize, reason: String },

    #[error("Account index {0} does not fit in a single byte")]
    AccountIndexOverflow(usize),

    #[error("Too many inputs: {found} (limit {limit})")]
    TooManyInputs { found: usize, limit: usize },

    #[error("Input hash verification requested without an input digest")]
    MissingInputDigest,

    #[error("Field slot {0} has no vtable entry")]
    SlotOutOfRange(usize),

    #[error("Table too large: up to {0} inline bytes")]
    TableTooLarge(usize),
}

/// Truncated or ill-formed buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Buffer truncated: needed {needed} bytes at offset {offset}, buffer is {len} bytes")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("Offset out of range: {offset} from position {position}")]
    OffsetOutOfRange { position: usize, offset: i64 },

    #[error("Misaligned value at {0}")]
    Unaligned(usize),

    #[error("Vector length {len} exceeds limit {limit}")]
    VectorTooLong { len: usize, limit: usize },

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("String at {0} is missing its terminator")]
    MissingTerminator(usize),

    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("Unknown instruction discriminant: {0}")]
    UnknownDiscriminant(u8),

    #[error("Nesting depth {depth} exceeds limit {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("Malformed buffer: {0}")]
    Malformed(String),

    #[error("Invalid record size: expected {expected} bytes, found {found} bytes")]
    InvalidRecordSize { expected: usize, found: usize },

    #[error("Invalid address length: expected 32 bytes, found {0} bytes")]
    InvalidAddressLength(usize),
}

/// Seed tuple that yields no usable address
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("Seed {index} is {len} bytes (limit {limit})")]
    SeedTooLong { index: usize, len: usize, limit: usize },

    #[error("Too many seeds: {count} (limit {limit})")]
    TooManySeeds { count: usize, limit: usize },

    #[error("Derived address lies on the curve")]
    OnCurve,

    #[error("No bump seed produces a valid address")]
    NoViableBump,

    #[error("{kind} expects {expected} seed parts, found {found}")]
    SeedCountMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),
}

impl ChannelError {
    /// Codec errors are deterministic; a retry with the same input fails the same way.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildError::InvalidUrl("not a url".to_string());
        assert_eq!(err.to_string(), "Invalid URL: not a url");

        let err = DecodeError::UnknownDiscriminant(9);
        assert_eq!(err.to_string(), "Unknown instruction discriminant: 9");

        let err = DerivationError::SeedTooLong {
            index: 2,
            len: 40,
            limit: 32,
        };
        assert_eq!(err.to_string(), "Seed 2 is 40 bytes (limit 32)");
    }

    #[test]
    fn test_truncated_display() {
        let err = DecodeError::Truncated {
            offset: 8,
            needed: 4,
            len: 10,
        };
        assert_eq!(
            err.to_string(),
            "Buffer truncated: needed 4 bytes at offset 8, buffer is 10 bytes"
        );
    }

    #[test]
    fn test_channel_error_from() {
        let err: ChannelError = DecodeError::InvalidUtf8.into();
        assert!(matches!(err, ChannelError::Decode(DecodeError::InvalidUtf8)));
        assert!(!err.is_retryable());

        let err: ChannelError = BuildError::MissingInputDigest.into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_layout_error_display() {
        assert_eq!(
            BuildError::SlotOutOfRange(40_000).to_string(),
            "Field slot 40000 has no vtable entry"
        );
        assert_eq!(
            DecodeError::Unaligned(13).to_string(),
            "Misaligned value at 13"
        );
    }
}
