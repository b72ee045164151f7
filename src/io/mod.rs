//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `record_store` - Append-only tab-separated record file
//! - `console` - Interactive generate/decode menu

pub mod console;
pub mod record_store;

// Re-export commonly used types
pub use console::run_menu;
pub use record_store::RecordStore;
