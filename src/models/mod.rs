//! Models Module - Data Structures & Configuration
//!
//! Single source of truth for every wire schema, output entity, error code
//! and run setting.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
