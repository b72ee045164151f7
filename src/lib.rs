//! Barcode ledger library
//!
//! Encodes digit-only product codes as framed 5-bit-per-digit barcodes,
//! keeps them in an append-only record file and decodes them back.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
