//! Codec - an encoder and decoder sharing one alphabet

use super::decoder::Decoder;
use super::encoder::Encoder;
use crate::domain::{CodeLimits, GlyphSet, PatternTable};
use crate::infra::Config;

#[derive(Debug, Clone, Default)]
pub struct Codec {
    encoder: Encoder,
    decoder: Decoder,
}

impl Codec {
    pub fn new(glyphs: GlyphSet, limits: CodeLimits) -> Self {
        let table = PatternTable::STANDARD;
        Self {
            encoder: Encoder::new(table.clone(), glyphs, limits),
            decoder: Decoder::new(table, glyphs, limits),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.glyphs(), config.code_limits())
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }
}
