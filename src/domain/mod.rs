//! Domain models - the barcode alphabet and its value types
//!
//! This module contains the canonical data types used throughout the system:
//! - `PatternTable` - digit <-> 5-bit pattern map plus the start/stop marker
//! - `ProductCode` - a validated digits-only code
//! - `BinarySequence` / `VisualSequence` - the two renderings of a barcode
//! - `Record` - a stored (code, visual) pair
//! - `CodecError` / `StoreError` - typed failures

pub mod error;
pub mod pattern;
pub mod types;

// Re-export commonly used types at module level
pub use error::{CodecError, StoreError, TableError};
pub use pattern::{Pattern, PatternTable, PATTERN_LEN};
pub use types::{BinarySequence, CodeLimits, Digit, GlyphSet, ProductCode, Record, VisualSequence};
