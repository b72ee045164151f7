//! Decoder - glyph string to binary sequence to product code
//!
//! Checks run in a fixed order and the first failure is terminal:
//! length, start marker, stop marker, payload alignment, digit count,
//! then each payload chunk in order.

use crate::domain::{
    BinarySequence, CodeLimits, CodecError, Digit, GlyphSet, Pattern, PatternTable, ProductCode,
    PATTERN_LEN,
};

#[derive(Debug, Clone)]
pub struct Decoder {
    table: PatternTable,
    glyphs: GlyphSet,
    limits: CodeLimits,
}

impl Decoder {
    pub fn new(table: PatternTable, glyphs: GlyphSet, limits: CodeLimits) -> Self {
        Self { table, glyphs, limits }
    }

    /// Map the mark glyph to `'1'` and the space glyph to `'0'`
    pub fn to_binary(&self, visual: &str) -> Result<BinarySequence, CodecError> {
        let (mark, space) = (self.glyphs.mark(), self.glyphs.space());
        visual
            .chars()
            .enumerate()
            .map(|(position, c)| {
                if c == mark {
                    Ok('1')
                } else if c == space {
                    Ok('0')
                } else {
                    Err(CodecError::InvalidGlyph { position, found: c })
                }
            })
            .collect::<Result<String, _>>()
            .map(BinarySequence::from_trusted)
    }

    pub fn decode(&self, binary: &BinarySequence) -> Result<ProductCode, CodecError> {
        let bytes = binary.as_bytes();
        let marker_len = PATTERN_LEN;
        let min = 2 * marker_len;

        if bytes.len() < min {
            return Err(CodecError::LengthTooShort { len: bytes.len(), min });
        }

        let (head, rest) = bytes.split_at(marker_len);
        let (payload, tail) = rest.split_at(rest.len() - marker_len);

        if !self.is_marker(head) {
            return Err(CodecError::MissingStartMarker);
        }
        if !self.is_marker(tail) {
            return Err(CodecError::MissingStopMarker);
        }
        if payload.len() % PATTERN_LEN != 0 {
            return Err(CodecError::MisalignedPayload { payload_len: payload.len() });
        }
        self.limits.check_len(payload.len() / PATTERN_LEN)?;

        let digits = payload
            .chunks_exact(PATTERN_LEN)
            .enumerate()
            .map(|(i, chunk)| {
                Pattern::from_ascii(chunk).and_then(|p| self.table.digit_for(p)).ok_or_else(|| {
                    CodecError::UnrecognizedPattern {
                        position: marker_len + i * PATTERN_LEN,
                        chunk: String::from_utf8_lossy(chunk).into_owned(),
                    }
                })
            })
            .collect::<Result<Vec<Digit>, _>>()?;

        Ok(ProductCode::from_digits(digits))
    }

    /// Decode a raw string, rejecting anything but `'0'`/`'1'`
    pub fn decode_str(&self, binary: &str) -> Result<ProductCode, CodecError> {
        self.decode(&BinarySequence::parse(binary)?)
    }

    /// Glyphs straight to product code
    pub fn scan(&self, visual: &str) -> Result<ProductCode, CodecError> {
        let binary = self.to_binary(visual)?;
        self.decode(&binary)
    }

    fn is_marker(&self, chunk: &[u8]) -> bool {
        Pattern::from_ascii(chunk) == Some(self.table.marker())
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(PatternTable::STANDARD, GlyphSet::default(), CodeLimits::default())
    }
}
