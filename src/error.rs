//! Error types for vcamframe
//!
//! Frame operations never return these: an operation that cannot proceed
//! yields the empty [`Frame`](crate::Frame) instead. Errors cover the
//! bitmap decoder, configuration loading and string parsing.

use thiserror::Error;

/// Result type alias for vcamframe operations
pub type Result<T> = std::result::Result<T, Error>;

/// vcamframe error type
#[derive(Error, Debug)]
pub enum Error {
    // Bitmap errors
    #[error("Not a bitmap: bad signature")]
    BadSignature,

    #[error("Bitmap truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("Unsupported bitmap bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("Unsupported bitmap compression: {0}")]
    UnsupportedCompression(u32),

    #[error("Bitmap has no pixels ({width}x{height})")]
    EmptyImage { width: i64, height: i64 },

    // Format errors
    #[error("Unknown pixel format: {0}")]
    UnknownPixelFormat(String),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Unknown option value: {0}")]
    UnknownOption(String),

    // General errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error comes from malformed bitmap input
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::BadSignature
                | Error::Truncated { .. }
                | Error::UnsupportedBitDepth(_)
                | Error::UnsupportedCompression(_)
                | Error::EmptyImage { .. }
        )
    }
}
