//! Error types for datgrab library

use std::io;
use thiserror::Error;

/// Main error type for datgrab operations
#[derive(Debug, Error)]
pub enum GrabError {
    /// IO error, usually a short read surfaced by a byte cursor
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Buffer is smaller than a fixed or declared minimum
    #[error("Buffer too short: need {needed} bytes, have {actual}")]
    TooShort { needed: usize, actual: usize },

    /// Numeric magic value did not match (FLIC header, FLIC frame)
    #[error("Bad magic: expected {expected:#06X}, found {found:#06X}")]
    BadMagic { expected: u32, found: u32 },

    /// Four-character signature did not match (RIFF, WAVE, MThd, MTrk)
    #[error("Bad signature: expected {0:?}")]
    BadSignature(&'static str),

    /// Declared length or offset runs past the end of the buffer
    #[error("Out of range: offset {offset} exceeds buffer length {length}")]
    OutOfRange { offset: u64, length: u64 },

    /// Valid input that this codec layer does not handle
    #[error("Unsupported subformat: {0}")]
    UnsupportedSubformat(String),

    /// The external Vorbis collaborator reported a failure
    #[error("Decoder failure: {0}")]
    DecoderFailure(String),

    /// Asset does not satisfy its validity invariant
    #[error("Invalid asset: {0}")]
    InvalidAsset(String),
}

/// Result type alias for datgrab operations
pub type Result<T> = std::result::Result<T, GrabError>;

impl GrabError {
    /// Shorthand for [`GrabError::TooShort`].
    pub fn too_short(needed: usize, actual: usize) -> Self {
        GrabError::TooShort { needed, actual }
    }

    /// Shorthand for [`GrabError::OutOfRange`].
    pub fn out_of_range(offset: usize, length: usize) -> Self {
        GrabError::OutOfRange {
            offset: offset as u64,
            length: length as u64,
        }
    }
}
