//! Encoder - product code to framed binary sequence to glyph string

use crate::domain::{
    BinarySequence, CodeLimits, CodecError, GlyphSet, PatternTable, ProductCode, VisualSequence,
    PATTERN_LEN,
};

#[derive(Debug, Clone)]
pub struct Encoder {
    table: PatternTable,
    glyphs: GlyphSet,
    limits: CodeLimits,
}

impl Encoder {
    pub fn new(table: PatternTable, glyphs: GlyphSet, limits: CodeLimits) -> Self {
        Self { table, glyphs, limits }
    }

    /// Check that `code` is all ASCII digits and within the configured limits
    pub fn validate_code(&self, code: &str) -> Result<ProductCode, CodecError> {
        ProductCode::parse(code, &self.limits)
    }

    /// Encode an unvalidated code, re-validating it first
    pub fn encode(&self, code: &str) -> Result<BinarySequence, CodecError> {
        let code = self.validate_code(code)?;
        Ok(self.encode_code(&code))
    }

    /// Marker, one pattern per digit, marker
    pub fn encode_code(&self, code: &ProductCode) -> BinarySequence {
        let marker = self.table.marker();
        let mut binary = String::with_capacity(PATTERN_LEN * (code.len() + 2));
        binary.extend(marker.chars());
        for digit in code.digits() {
            binary.extend(self.table.pattern_for(digit).chars());
        }
        binary.extend(marker.chars());
        BinarySequence::from_trusted(binary)
    }

    /// Map `'1'` to the mark glyph and `'0'` to the space glyph
    pub fn to_visual(&self, binary: &str) -> Result<VisualSequence, CodecError> {
        binary
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '1' => Ok(self.glyphs.mark()),
                '0' => Ok(self.glyphs.space()),
                found => Err(CodecError::InvalidBinaryCharacter { position, found }),
            })
            .collect::<Result<String, _>>()
            .map(VisualSequence::new)
    }

    /// Validate, encode and render in one step
    pub fn render(&self, code: &str) -> Result<VisualSequence, CodecError> {
        let binary = self.encode(code)?;
        self.to_visual(binary.as_str())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(PatternTable::STANDARD, GlyphSet::default(), CodeLimits::default())
    }
}
