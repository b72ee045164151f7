//! Services - barcode codec and session orchestration
//!
//! - `encoder` - Product code to binary sequence to glyphs
//! - `decoder` - Glyphs to binary sequence to product code
//! - `codec` - Encoder and decoder sharing one alphabet
//! - `session` - Generate, list and decode against the record store

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod session;

pub use codec::Codec;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use session::{DecodedRecord, Session, SessionError};
