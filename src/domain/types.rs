//! Shared value types for the barcode codec and record store

use super::error::{CodecError, TableError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default maximum number of digits in a product code
pub const DEFAULT_MAX_CODE_LEN: usize = 100;

/// A single decimal digit, 0-9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Digit(u8);

impl Digit {
    pub const fn new(value: u8) -> Option<Self> {
        if value < 10 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Caller guarantees `index < 10`
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u8)
    }

    /// ASCII `'0'..='9'` only
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn to_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Limits applied to product codes on both encode and decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeLimits {
    pub max_code_len: usize,
    /// Accept the empty code (a marker-only barcode)
    pub allow_empty: bool,
}

impl Default for CodeLimits {
    fn default() -> Self {
        Self { max_code_len: DEFAULT_MAX_CODE_LEN, allow_empty: false }
    }
}

impl CodeLimits {
    /// Check a digit count against the limits
    pub fn check_len(&self, len: usize) -> Result<(), CodecError> {
        if len == 0 && !self.allow_empty {
            return Err(CodecError::EmptyCode);
        }
        if len > self.max_code_len {
            return Err(CodecError::CodeTooLong { len, max: self.max_code_len });
        }
        Ok(())
    }
}

/// A validated, digits-only product code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    pub fn parse(code: &str, limits: &CodeLimits) -> Result<Self, CodecError> {
        let invalid = code.chars().enumerate().find(|&(_, c)| Digit::from_char(c).is_none());
        if let Some((position, found)) = invalid {
            return Err(CodecError::InvalidDigit { position, found });
        }
        // All ASCII from here on, so byte length is digit count
        limits.check_len(code.len())?;
        Ok(Self(code.to_string()))
    }

    pub(crate) fn from_digits(digits: impl IntoIterator<Item = Digit>) -> Self {
        Self(digits.into_iter().map(Digit::to_char).collect())
    }

    pub fn digits(&self) -> impl Iterator<Item = Digit> + '_ {
        self.0.bytes().map(|b| Digit(b - b'0'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ProductCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A string over `'0'`/`'1'` only
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinarySequence(String);

impl BinarySequence {
    pub fn parse(binary: &str) -> Result<Self, CodecError> {
        match binary.chars().enumerate().find(|(_, c)| *c != '0' && *c != '1') {
            Some((position, found)) => Err(CodecError::InvalidBinaryCharacter { position, found }),
            None => Ok(Self(binary.to_string())),
        }
    }

    /// Caller guarantees only `'0'`/`'1'`
    pub(crate) fn from_trusted(binary: String) -> Self {
        Self(binary)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BinarySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A barcode rendered in mark/space glyphs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisualSequence(String);

impl VisualSequence {
    pub(crate) fn new(visual: String) -> Self {
        Self(visual)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in glyphs
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for VisualSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two glyphs a barcode is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSet {
    mark: char,
    space: char,
}

impl GlyphSet {
    pub const DEFAULT_MARK: char = '|';
    pub const DEFAULT_SPACE: char = ' ';

    pub fn new(mark: char, space: char) -> Result<Self, TableError> {
        let reason = if mark == space {
            Some("glyphs must differ")
        } else if is_record_delimiter(mark) || is_record_delimiter(space) {
            Some("glyphs must not be a tab or line break")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(TableError::InvalidGlyphSet { mark, space, reason }),
            None => Ok(Self { mark, space }),
        }
    }

    pub fn mark(&self) -> char {
        self.mark
    }

    pub fn space(&self) -> char {
        self.space
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self { mark: Self::DEFAULT_MARK, space: Self::DEFAULT_SPACE }
    }
}

fn is_record_delimiter(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
}

/// A stored (code, visual barcode) pair
///
/// Fields are kept as read from the store; decoding re-validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub code: String,
    pub visual: String,
}

impl Record {
    pub fn new(code: impl Into<String>, visual: impl Into<String>) -> Self {
        Self { code: code.into(), visual: visual.into() }
    }
}
