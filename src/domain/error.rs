//! Error types for the codec, pattern table and record store

use std::path::PathBuf;
use thiserror::Error;

/// Terminal failure of a single encode or decode operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("code must contain only digits: found {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },

    #[error("code is empty")]
    EmptyCode,

    #[error("code has {len} digits, maximum is {max}")]
    CodeTooLong { len: usize, max: usize },

    #[error("binary sequence contains {found:?} at position {position}")]
    InvalidBinaryCharacter { position: usize, found: char },

    #[error("barcode contains invalid glyph {found:?} at position {position}")]
    InvalidGlyph { position: usize, found: char },

    #[error("sequence of length {len} is shorter than the {min} characters of two markers")]
    LengthTooShort { len: usize, min: usize },

    #[error("sequence does not begin with the start marker")]
    MissingStartMarker,

    #[error("sequence does not end with the stop marker")]
    MissingStopMarker,

    #[error("payload of length {payload_len} is not a multiple of the pattern length")]
    MisalignedPayload { payload_len: usize },

    #[error("unrecognized pattern {chunk:?} at position {position}")]
    UnrecognizedPattern { position: usize, chunk: String },
}

/// Invalid pattern table or glyph alphabet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("digits {first} and {second} share the same pattern")]
    DuplicatePattern { first: u8, second: u8 },

    #[error("pattern for digit {digit} equals the start/stop marker")]
    MarkerCollision { digit: u8 },

    #[error("invalid glyph set (mark {mark:?}, space {space:?}): {reason}")]
    InvalidGlyphSet { mark: char, space: char, reason: &'static str },
}

/// Record store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record field {field} contains a tab or line break")]
    InvalidField { field: &'static str },

    #[error("record line of {len} characters exceeds maximum of {max}")]
    LineTooLong { len: usize, max: usize },
}
