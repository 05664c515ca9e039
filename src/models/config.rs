//! Scraper configuration
//!
//! Built entirely from `utils::constants`; nothing is read from the
//! environment. The `with_*` overrides exist for tests and embedding.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::constants::{
    ACTIVITIES_FILE, ACTIVITY_PAGE_SIZE, BACKOFF_BASE_MS, COLLECTION_SYMBOL_CANDIDATES,
    DEFAULT_SYMBOL, HOLDERS_FILE, LISTINGS_FILE, MAX_ACTIVITY_PAGES, MAX_RETRIES, ME_API_BASE,
    ME_RPC_BASE, NFTS_FILE, OFFCHAIN_DELAY_MS, OFFCHAIN_TIMEOUT_SECS, OUTPUT_DIR, PAGE_SIZE,
    REQUEST_DELAY_MS, REQUEST_TIMEOUT_SECS, RPC_PAGE_SIZE, SEARCH_NEEDLE, SEARCH_PAGE_SIZE,
    SEARCH_TERMS, STATS_FILE, SUMMARY_CSV_FILE, TOP_HOLDERS,
};

/// Retry / rate-limit policy shared by every marketplace request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per request
    pub max_retries: u32,
    /// Backoff base (flat for HTTP errors, doubled per attempt otherwise)
    pub backoff_base: Duration,
    /// Courtesy pause before every attempt
    pub request_delay: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            backoff_base: Duration::from_millis(BACKOFF_BASE_MS),
            request_delay: Duration::from_millis(REQUEST_DELAY_MS),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

/// The six result files
#[derive(Debug, Clone)]
pub struct OutputFiles {
    pub dir: PathBuf,
    pub stats: &'static str,
    pub listings: &'static str,
    pub activities: &'static str,
    pub nfts: &'static str,
    pub holders: &'static str,
    pub summary_csv: &'static str,
}

impl OutputFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stats: STATS_FILE,
            listings: LISTINGS_FILE,
            activities: ACTIVITIES_FILE,
            nfts: NFTS_FILE,
            holders: HOLDERS_FILE,
            summary_csv: SUMMARY_CSV_FILE,
        }
    }

    /// Full path of a file inside the output directory
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

/// Configuration for one scrape run
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Marketplace REST base URL
    pub api_base: String,
    /// Marketplace RPC-style query base URL
    pub rpc_base: String,
    /// Collection symbols tried in order
    pub symbol_candidates: Vec<String>,
    /// Keyword terms for the search fallback
    pub search_terms: Vec<String>,
    /// Substring a search hit must contain
    pub search_needle: String,
    /// Search page size
    pub search_page_size: usize,
    /// Symbol used when nothing resolves
    pub default_symbol: String,
    /// Marketplace retry policy
    pub retry: RetryPolicy,
    /// Pause before every off-chain metadata fetch
    pub offchain_delay: Duration,
    /// Off-chain metadata timeout
    pub offchain_timeout: Duration,
    /// Listings page size
    pub page_size: usize,
    /// Activities page size
    pub activity_page_size: usize,
    /// Activity page cap
    pub max_activity_pages: usize,
    /// RPC token query page size
    pub rpc_page_size: usize,
    /// Size of the top-holders view
    pub top_holders: usize,
    /// Output location
    pub output: OutputFiles,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            api_base: ME_API_BASE.to_string(),
            rpc_base: ME_RPC_BASE.to_string(),
            symbol_candidates: COLLECTION_SYMBOL_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            search_terms: SEARCH_TERMS.iter().map(|s| s.to_string()).collect(),
            search_needle: SEARCH_NEEDLE.to_string(),
            search_page_size: SEARCH_PAGE_SIZE,
            default_symbol: DEFAULT_SYMBOL.to_string(),
            retry: RetryPolicy::default(),
            offchain_delay: Duration::from_millis(OFFCHAIN_DELAY_MS),
            offchain_timeout: Duration::from_secs(OFFCHAIN_TIMEOUT_SECS),
            page_size: PAGE_SIZE,
            activity_page_size: ACTIVITY_PAGE_SIZE,
            max_activity_pages: MAX_ACTIVITY_PAGES,
            rpc_page_size: RPC_PAGE_SIZE,
            top_holders: TOP_HOLDERS,
            output: OutputFiles::new(OUTPUT_DIR),
        }
    }
}

impl ScraperConfig {
    /// Point the REST calls at another host (e.g. a mock server)
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Point the RPC-style query at another host
    pub fn with_rpc_base(mut self, base: impl Into<String>) -> Self {
        self.rpc_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Write results somewhere else
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output = OutputFiles::new(dir.as_ref());
        self
    }

    /// Drop courtesy pauses and shrink backoff to 1ms
    pub fn without_delays(mut self) -> Self {
        self.retry.request_delay = Duration::ZERO;
        self.retry.backoff_base = Duration::from_millis(1);
        self.retry.timeout = Duration::from_secs(5);
        self.offchain_delay = Duration::ZERO;
        self.offchain_timeout = Duration::from_secs(5);
        self
    }
}
