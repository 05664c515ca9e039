//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constants, unit conversion and the JSON/CSV exporters.

pub mod constants;
pub mod export;

pub use constants::*;
pub use export::*;
