//! Constants Module - Single Source of Truth
//!
//! Every endpoint, page size, delay and file name used by the scraper is
//! defined here. `ScraperConfig::default()` is built from these values and
//! no other module hardcodes them.

use serde_json::{Number, Value};

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "GorbagiosScraper";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for every outgoing request
pub const USER_AGENT: &str = "GorbagiosScraper/1.0";

// ============================================
// MARKETPLACE ENDPOINTS
// ============================================

/// Magic Eden REST API (v2)
pub const ME_API_BASE: &str = "https://api-mainnet.magiceden.dev/v2";

/// Magic Eden internal RPC-style query API
pub const ME_RPC_BASE: &str = "https://api-mainnet.magiceden.dev/rpc";

// ============================================
// COLLECTION IDENTIFICATION
// ============================================

/// Candidate collection symbols, probed in order
pub const COLLECTION_SYMBOL_CANDIDATES: [&str; 4] =
    ["gorbagio", "gorbagios", "gorbagana", "gorbagana_nft"];

/// Keyword terms for the collection-search fallback
pub const SEARCH_TERMS: [&str; 2] = ["gorbag", "gorba"];

/// Substring a search hit must contain in its name or symbol (case-insensitive)
pub const SEARCH_NEEDLE: &str = "gorba";

/// Page size for the collection-search endpoint
pub const SEARCH_PAGE_SIZE: usize = 50;

/// Used when neither the candidates nor the search resolve
pub const DEFAULT_SYMBOL: &str = "gorbagios";

// ============================================
// RATE LIMITING & RETRY
// ============================================

/// Pause before every marketplace API attempt (milliseconds)
pub const REQUEST_DELAY_MS: u64 = 250;

/// Pause before every off-chain metadata fetch (milliseconds)
pub const OFFCHAIN_DELAY_MS: u64 = 100;

/// Marketplace request timeout (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Off-chain metadata request timeout (seconds)
pub const OFFCHAIN_TIMEOUT_SECS: u64 = 15;

/// Attempts per request before giving up
pub const MAX_RETRIES: u32 = 3;

/// Base backoff (milliseconds): flat for HTTP errors, doubled per attempt
/// for network errors and 429s
pub const BACKOFF_BASE_MS: u64 = 1000;

// ============================================
// PAGINATION
// ============================================

/// Listings page size (Magic Eden default)
pub const PAGE_SIZE: usize = 20;

/// Activities page size
pub const ACTIVITY_PAGE_SIZE: usize = 100;

/// Safety cap on activity history depth
pub const MAX_ACTIVITY_PAGES: usize = 50;

/// RPC token query page size
pub const RPC_PAGE_SIZE: usize = 20;

// ============================================
// AGGREGATION
// ============================================

/// Holders kept in the `top_holders` view
pub const TOP_HOLDERS: usize = 50;

/// Log detail-fetch progress every N mints
pub const DETAIL_PROGRESS_EVERY: usize = 100;

/// Error tag for a mint whose detail fetch failed
pub const FETCH_FAILED_MARKER: &str = "failed to fetch";

/// Trait type name used when an attribute has no `trait_type`
pub const UNKNOWN_TRAIT: &str = "unknown";

/// Prefix of every synthesized trait column
pub const TRAIT_PREFIX: &str = "trait_";

/// Nested fields left out of the CSV mirror
pub const CSV_SKIP_KEYS: [&str; 3] = ["attributes", "extra", "rarity"];

// ============================================
// OUTPUT FILES
// ============================================

/// Output directory (relative to the working directory)
pub const OUTPUT_DIR: &str = "gorbagios_data";

pub const STATS_FILE: &str = "gorbagios_collection_stats.json";
pub const LISTINGS_FILE: &str = "gorbagios_listings.json";
pub const ACTIVITIES_FILE: &str = "gorbagios_activities.json";
pub const NFTS_FILE: &str = "gorbagios_nfts_full.json";
pub const HOLDERS_FILE: &str = "gorbagios_holders.json";
pub const SUMMARY_CSV_FILE: &str = "gorbagios_summary.csv";

// ============================================
// UNIT CONVERSION
// ============================================

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: f64 = 1e9;

/// Convert a raw lamport amount to SOL. Absent or null yields 0.0.
pub fn lamports_to_sol(raw: Option<&Number>) -> f64 {
    raw.and_then(Number::as_f64)
        .map(|lamports| lamports / LAMPORTS_PER_SOL)
        .unwrap_or(0.0)
}

/// Same as [`lamports_to_sol`] for an untyped JSON value.
///
/// Numeric strings are accepted since some endpoints quote large amounts.
pub fn value_to_sol(raw: Option<&Value>) -> f64 {
    match raw {
        Some(Value::Number(n)) => lamports_to_sol(Some(n)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(|lamports| lamports / LAMPORTS_PER_SOL)
            .unwrap_or(0.0),
        _ => 0.0,
    }
}
