//! # Codec Configuration
//!
//! Limits applied while decoding. A buffer received from the network or read
//! from an account can declare arbitrary lengths and nesting; these bounds keep
//! the work a single decode call performs proportional to its input.

use std::fmt;

/// Decode limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecConfig {
    /// Maximum table nesting (root table is depth 0)
    pub max_depth: usize,
    /// Maximum element count of any single vector
    pub max_vector_len: usize,
    /// Maximum inputs carried by one execution request
    pub max_inputs: usize,
}

impl CodecConfig {
    /// Default limits
    /// - Depth: 8 (records nest at most two tables deep)
    /// - Vector length: 1 Mi elements
    /// - Inputs: 255 (an InputSet account index is one byte)
    pub const DEFAULT: Self = Self {
        max_depth: 8,
        max_vector_len: 1 << 20,
        max_inputs: 255,
    };

    /// Create a new configuration with validation
    pub const fn new(
        max_depth: usize,
        max_vector_len: usize,
        max_inputs: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            max_depth,
            max_vector_len,
            max_inputs,
        };

        if max_depth < 1 || max_depth > 64 {
            return Err(ConfigError::InvalidDepth);
        }
        if max_vector_len == 0 || max_vector_len > u32::MAX as usize {
            return Err(ConfigError::InvalidVectorLen);
        }
        if max_inputs == 0 || max_inputs > 255 {
            return Err(ConfigError::InvalidInputLimit);
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::new(self.max_depth, self.max_vector_len, self.max_inputs).map(|_| ())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CodecConfig {{ max_depth: {}, max_vector_len: {}, max_inputs: {} }}",
            self.max_depth, self.max_vector_len, self.max_inputs,
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Depth must be in range [1, 64]
    InvalidDepth,
    /// Vector limit must be in range [1, 2^32 - 1]
    InvalidVectorLen,
    /// Input limit must be in range [1, 255]
    InvalidInputLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDepth => write!(f, "max_depth must be in range [1, 64]"),
            ConfigError::InvalidVectorLen => {
                write!(f, "max_vector_len must be in range [1, 4294967295]")
            }
            ConfigError::InvalidInputLimit => write!(f, "max_inputs must be in range [1, 255]"),
        }
    }
}

impl std::error::Error for ConfigError {}
