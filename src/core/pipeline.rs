//! End-to-end scrape run
//!
//! resolver -> stats -> listings -> activities -> RPC tokens -> mint union
//! -> detail fetch -> holder aggregation -> exports
//!
//! Every stage runs to completion before the next starts. Each result file
//! is written as soon as its data is final.

use serde_json::Map;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::details::fetch_all_nft_details;
use crate::core::fetchers::{fetch_activities, fetch_all_listings, fetch_collection_stats, fetch_rpc_tokens};
use crate::core::holders::compute_holder_distribution;
use crate::core::mints::collect_mints;
use crate::core::resolver::SymbolResolver;
use crate::models::config::ScraperConfig;
use crate::models::errors::{AppError, AppResult};
use crate::providers::MarketplaceClient;
use crate::utils::export::{export_csv, save_json};

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    pub symbol: String,
    pub resolved_by: &'static str,
    pub nft_count: usize,
    pub failed_nfts: usize,
    pub listing_count: usize,
    pub activity_count: usize,
    pub unique_holders: usize,
    pub floor_price_sol: Option<f64>,
    pub volume_all_sol: Option<f64>,
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl ScrapeReport {
    /// Human-readable run summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n{}\n", "=".repeat(55)));
        out.push_str("  SCRAPE COMPLETE\n");
        out.push_str(&format!("{}\n", "=".repeat(55)));
        out.push_str(&format!("  Collection:      {} (via {})\n", self.symbol, self.resolved_by));
        out.push_str(&format!("  NFTs scraped:    {} ({} failed)\n", self.nft_count, self.failed_nfts));
        out.push_str(&format!("  Listings:        {}\n", self.listing_count));
        out.push_str(&format!("  Activities:      {}\n", self.activity_count));
        out.push_str(&format!("  Unique holders:  {}\n", self.unique_holders));
        if let Some(floor) = self.floor_price_sol {
            out.push_str(&format!("  Floor price:     {} SOL\n", floor));
        }
        if let Some(volume) = self.volume_all_sol {
            out.push_str(&format!("  Total volume:    {} SOL\n", volume));
        }
        out.push_str(&format!("\n  Output dir:      {}\n", self.output_dir.display()));
        out.push_str("  Files created:\n");
        for path in &self.files {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            out.push_str(&format!("    {:<40} ({} bytes)\n", name, size));
        }
        out.push_str(&"=".repeat(55));
        out
    }
}

/// Owns the client and configuration for one run
pub struct Scraper {
    client: MarketplaceClient,
    config: ScraperConfig,
}

impl Scraper {
    pub fn new(client: MarketplaceClient, config: ScraperConfig) -> Self {
        Self { client, config }
    }

    /// Build the client from the configuration
    pub fn from_config(config: ScraperConfig) -> AppResult<Self> {
        let client = MarketplaceClient::new(&config)?;
        Ok(Self::new(client, config))
    }

    /// Run every stage and write the six result files.
    ///
    /// Only an unusable output directory or a failed write aborts the run.
    pub async fn run(&self) -> AppResult<ScrapeReport> {
        let output = &self.config.output;
        fs::create_dir_all(&output.dir).map_err(|e| AppError::output_dir(&output.dir, e))?;
        let mut files = Vec::with_capacity(6);

        // Step 0: symbol
        let resolution = SymbolResolver::from_config(&self.config).resolve(&self.client).await;
        let (symbol, resolved_by) = match resolution {
            Some(r) => (r.symbol, r.strategy),
            None => (self.config.default_symbol.clone(), "default"),
        };

        // Step 1: stats
        let stats = fetch_collection_stats(&self.client, &symbol).await;
        let stats_path = output.path(output.stats);
        match &stats {
            Some(stats) => save_json(stats, &stats_path)?,
            None => save_json(&Map::new(), &stats_path)?,
        }
        files.push(stats_path);

        // Step 2: listings
        let listings = fetch_all_listings(&self.client, &symbol, &self.config).await;
        let listings_path = output.path(output.listings);
        save_json(&listings, &listings_path)?;
        files.push(listings_path);

        // Step 3: activities
        let activities = fetch_activities(&self.client, &symbol, &self.config).await;
        let activities_path = output.path(output.activities);
        save_json(&activities, &activities_path)?;
        files.push(activities_path);

        // Step 4: mint union + details
        let rpc_tokens = fetch_rpc_tokens(&self.client, &symbol, &self.config).await;
        let mints = collect_mints(&listings, &rpc_tokens, &activities);

        let nfts = if mints.is_empty() {
            warn!("⚠️ No mint addresses found. The collection symbol may be wrong.");
            warn!("   Try visiting https://magiceden.io and searching for 'Gorbagios'");
            warn!("   Then update COLLECTION_SYMBOL_CANDIDATES in utils/constants.rs.");
            Vec::new()
        } else {
            fetch_all_nft_details(&self.client, &mints).await
        };
        let nfts_path = output.path(output.nfts);
        save_json(&nfts, &nfts_path)?;
        files.push(nfts_path);

        // Step 5: holders
        let holders = compute_holder_distribution(&nfts, self.config.top_holders);
        let holders_path = output.path(output.holders);
        save_json(&holders, &holders_path)?;
        files.push(holders_path);

        // Step 6: CSV
        let csv_path = output.path(output.summary_csv);
        export_csv(&nfts, &csv_path)?;
        files.push(csv_path);

        info!("✅ Scrape finished for '{}'", symbol);

        Ok(ScrapeReport {
            resolved_by,
            nft_count: nfts.len(),
            failed_nfts: nfts.iter().filter(|n| n.is_failed()).count(),
            listing_count: listings.len(),
            activity_count: activities.len(),
            unique_holders: holders.unique_holders,
            floor_price_sol: stats.as_ref().map(|s| s.floor_price_sol),
            volume_all_sol: stats.as_ref().map(|s| s.volume_all_sol),
            output_dir: output.dir.clone(),
            files,
            symbol,
        })
    }
}
