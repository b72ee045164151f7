//! Session - generate, list and decode barcodes against one record store

use super::codec::Codec;
use crate::domain::{CodecError, ProductCode, Record, StoreError, VisualSequence};
use crate::infra::{Config, Metrics, Operation};
use crate::io::RecordStore;
use serde_json::json;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no records found")]
    NoRecords,

    #[error("selection {selection} is out of range 1-{count}")]
    SelectionOutOfRange { selection: usize, count: usize },
}

/// A stored record together with the result of decoding its barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    /// 1-based position in the store
    pub index: usize,
    pub record: Record,
    pub decoded: Result<ProductCode, CodecError>,
}

impl DecodedRecord {
    /// True when the barcode decodes to the code stored next to it
    pub fn matches_stored_code(&self) -> bool {
        matches!(&self.decoded, Ok(code) if code.as_str() == self.record.code)
    }

    pub fn to_json(&self) -> serde_json::Value {
        match &self.decoded {
            Ok(code) => json!({
                "index": self.index,
                "code": self.record.code,
                "visual": self.record.visual,
                "decoded": code,
                "matches": self.matches_stored_code(),
            }),
            Err(e) => json!({
                "index": self.index,
                "code": self.record.code,
                "visual": self.record.visual,
                "error": e.to_string(),
            }),
        }
    }
}

pub struct Session {
    codec: Codec,
    store: RecordStore,
    metrics: Metrics,
}

impl Session {
    pub fn new(codec: Codec, store: RecordStore) -> Self {
        Self { codec, store, metrics: Metrics::new() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Codec::from_config(config), RecordStore::from_config(config))
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Validate and render a code without storing it
    pub fn render(&self, code: &str) -> Result<VisualSequence, CodecError> {
        let start = Instant::now();
        let result = self.codec.encoder().render(code);
        self.metrics.record_operation(Operation::Encode, result.is_ok(), start.elapsed());
        if let Err(e) = &result {
            debug!(code = %code, error = %e, "render_rejected");
        }
        result
    }

    /// Render a code and append it to the store
    pub fn generate(&self, code: &str) -> Result<Record, SessionError> {
        let visual = self.render(code)?;
        let record = Record::new(code, visual.into_string());
        self.save(&record)?;
        info!(code = %record.code, glyphs = record.visual.chars().count(), "barcode_generated");
        Ok(record)
    }

    /// Append an already rendered record
    pub fn save(&self, record: &Record) -> Result<(), SessionError> {
        self.store.append(record)?;
        self.metrics.record_append();
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Record>, SessionError> {
        let records = self.store.read_all()?;
        self.metrics.record_read(records.len());
        Ok(records)
    }

    /// Decode the record at a 1-based `selection`
    pub fn decode_selection(&self, selection: usize) -> Result<DecodedRecord, SessionError> {
        let records = self.list()?;
        let count = records.len();
        if count == 0 {
            return Err(SessionError::NoRecords);
        }
        if selection == 0 || selection > count {
            return Err(SessionError::SelectionOutOfRange { selection, count });
        }

        let record = records.into_iter().nth(selection - 1).ok_or(SessionError::NoRecords)?;
        let decoded = self.scan(&record.visual);
        let result = DecodedRecord { index: selection, record, decoded };

        match &result.decoded {
            Ok(code) if result.matches_stored_code() => {
                info!(index = selection, code = %code, "record_decoded")
            }
            Ok(code) => warn!(
                index = selection,
                stored = %result.record.code,
                decoded = %code,
                "record_code_mismatch"
            ),
            Err(e) => warn!(index = selection, error = %e, "record_undecodable"),
        }
        Ok(result)
    }

    /// Decode an arbitrary glyph string
    pub fn scan(&self, visual: &str) -> Result<ProductCode, CodecError> {
        let start = Instant::now();
        let result = self.codec.decoder().scan(visual);
        self.metrics.record_operation(Operation::Decode, result.is_ok(), start.elapsed());
        result
    }
}
