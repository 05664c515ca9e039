//! Core Module - Pipeline Stages
//!
//! Symbol resolution, pagination, fetch stages, mint aggregation, detail
//! fetch, holder distribution and the run orchestration.

pub mod details;
pub mod fetchers;
pub mod holders;
pub mod mints;
pub mod pagination;
pub mod pipeline;
pub mod resolver;

pub use details::*;
pub use fetchers::*;
pub use holders::*;
pub use mints::*;
pub use pagination::*;
pub use pipeline::*;
pub use resolver::*;
