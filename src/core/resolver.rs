//! Collection symbol resolution
//!
//! An ordered chain of strategies, short-circuited by the first hit:
//! 1. probe each candidate symbol (stats floor, then a 1-item listings page)
//! 2. scan the collection directory for a name/symbol containing a needle
//! 3. fall back to a hardcoded symbol
//!
//! Falling through to the default is degraded but not fatal: later stages
//! may simply come back empty.

use serde_json::Value;
use tracing::{info, warn};

use crate::models::config::ScraperConfig;
use crate::providers::MarketplaceClient;

/// One link of the resolution chain
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionStrategy {
    /// Probe known symbols in order
    Candidates(Vec<String>),
    /// Scan the collection directory once per term
    Search {
        terms: Vec<String>,
        needle: String,
        page_size: usize,
    },
    /// Always succeeds
    Fallback(String),
}

impl ResolutionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Candidates(_) => "candidates",
            Self::Search { .. } => "search",
            Self::Fallback(_) => "fallback",
        }
    }

    pub async fn attempt(&self, client: &MarketplaceClient) -> Option<String> {
        match self {
            Self::Candidates(symbols) => {
                for symbol in symbols {
                    if client.collection_stats(symbol).await.is_some_and(|s| has_floor_price(&s)) {
                        info!("✅ Found collection: '{}'", symbol);
                        return Some(symbol.clone());
                    }
                    if client.listings_page(symbol, 0, 1).await.is_some_and(|l| is_non_empty_array(&l)) {
                        info!("✅ Found collection via listings: '{}'", symbol);
                        return Some(symbol.clone());
                    }
                }
                None
            }
            Self::Search { terms, needle, page_size } => {
                info!("🔍 Trying Magic Eden collection search...");
                // The directory endpoint takes no keyword, so each term is one
                // more scan of the same first page.
                for _term in terms {
                    if let Some(results) = client.collections_page(0, *page_size).await {
                        if let Some(symbol) = find_search_hit(&results, needle) {
                            info!("✅ Found via search: '{}'", symbol);
                            return Some(symbol);
                        }
                    }
                }
                None
            }
            Self::Fallback(symbol) => {
                warn!("⚠️ Could not auto-detect symbol. Using '{}' as default.", symbol);
                warn!("   If this doesn't work, find the correct slug from:");
                warn!("   https://magiceden.io/marketplace/<slug>");
                Some(symbol.clone())
            }
        }
    }
}

/// Resolved symbol and the strategy that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub symbol: String,
    pub strategy: &'static str,
}

/// Ordered strategy chain
#[derive(Debug, Clone)]
pub struct SymbolResolver {
    strategies: Vec<ResolutionStrategy>,
}

impl SymbolResolver {
    pub fn new(strategies: Vec<ResolutionStrategy>) -> Self {
        Self { strategies }
    }

    /// Candidates -> search -> default, as configured
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(vec![
            ResolutionStrategy::Candidates(config.symbol_candidates.clone()),
            ResolutionStrategy::Search {
                terms: config.search_terms.clone(),
                needle: config.search_needle.clone(),
                page_size: config.search_page_size,
            },
            ResolutionStrategy::Fallback(config.default_symbol.clone()),
        ])
    }

    pub fn strategies(&self) -> &[ResolutionStrategy] {
        &self.strategies
    }

    pub async fn resolve(&self, client: &MarketplaceClient) -> Option<Resolution> {
        info!("🔎 Detecting collection symbol on Magic Eden...");
        for strategy in &self.strategies {
            if let Some(symbol) = strategy.attempt(client).await {
                return Some(Resolution {
                    symbol,
                    strategy: strategy.name(),
                });
            }
        }
        None
    }
}

/// Stats body with a present, non-null `floorPrice`
pub fn has_floor_price(stats: &Value) -> bool {
    stats.get("floorPrice").is_some_and(|floor| !floor.is_null())
}

fn is_non_empty_array(value: &Value) -> bool {
    value.as_array().is_some_and(|items| !items.is_empty())
}

/// First directory entry whose name or symbol contains `needle`
/// (case-insensitive) and that carries a usable symbol.
pub fn find_search_hit(results: &Value, needle: &str) -> Option<String> {
    let needle = needle.to_lowercase();
    results.as_array()?.iter().find_map(|collection| {
        let name = collection.get("name").and_then(Value::as_str).unwrap_or_default();
        let symbol = collection.get("symbol").and_then(Value::as_str).unwrap_or_default();

        let matches = name.to_lowercase().contains(&needle) || symbol.to_lowercase().contains(&needle);
        (matches && !symbol.is_empty()).then(|| symbol.to_string())
    })
}
