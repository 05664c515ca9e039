//! Gorbagios Scraper Library
//!
//! Pulls marketplace and on-chain-derived data for the Gorbagios NFT
//! collection from the Magic Eden API and writes it out as flat files:
//! - collection stats, listings and activity history (JSON)
//! - every NFT with flattened traits (JSON + CSV)
//! - holder distribution snapshot (JSON)

pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{ScrapeReport, Scraper, SymbolResolver};
pub use models::{AppError, AppResult, ErrorCode, RetryPolicy, ScraperConfig};
pub use providers::MarketplaceClient;
