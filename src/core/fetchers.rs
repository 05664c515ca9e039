//! Collection-level fetch stages: stats, listings, activities, RPC tokens
//!
//! Each stage walks its endpoint, normalizes what came back and hands the
//! result to the next stage by value. Absence of data is logged and yields
//! an empty result, never an error.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::core::pagination::{walk_pages, ActivityPages, ListingPages, RpcTokenPages};
use crate::models::config::ScraperConfig;
use crate::models::types::{
    has_fields, Activity, CollectionStats, Listing, RawCollectionStats, RawListing, RpcToken,
};
use crate::providers::MarketplaceClient;

/// Collection stats snapshot; `None` when the endpoint gave nothing usable
pub async fn fetch_collection_stats(client: &MarketplaceClient, symbol: &str) -> Option<CollectionStats> {
    info!("📊 Fetching collection stats...");

    let raw = match client.collection_stats(symbol).await {
        Some(body) if has_fields(&body) => serde_json::from_value::<RawCollectionStats>(body).ok(),
        _ => None,
    };
    let Some(raw) = raw else {
        error!("❌ Failed to fetch collection stats");
        return None;
    };

    let fetched_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false);
    let stats = CollectionStats::from_raw(symbol, raw, fetched_at);

    let listed = match &stats.listed_count {
        Some(count) => count.to_string(),
        None => "n/a".to_string(),
    };
    info!(
        "  Floor: {:.4} SOL | Listed: {} | Total Volume: {:.2} SOL",
        stats.floor_price_sol, listed, stats.volume_all_sol
    );
    Some(stats)
}

/// Every current listing, cleaned
pub async fn fetch_all_listings(
    client: &MarketplaceClient,
    symbol: &str,
    config: &ScraperConfig,
) -> Vec<Listing> {
    info!("🏷️ Fetching all current listings...");

    let raw = walk_pages(&ListingPages { client, symbol }, config.page_size, None).await;
    info!("  Total listings: {}", raw.len());

    // Only non-objects are dropped; bad fields inside a listing read as null
    raw.into_iter()
        .filter(Value::is_object)
        .filter_map(|item| match serde_json::from_value::<RawListing>(item) {
            Ok(listing) => Some(Listing::from(listing)),
            Err(e) => {
                debug!("Skipping malformed listing: {}", e);
                None
            }
        })
        .collect()
}

/// Recent activity history, newest first, capped at `max_activity_pages`
pub async fn fetch_activities(
    client: &MarketplaceClient,
    symbol: &str,
    config: &ScraperConfig,
) -> Vec<Activity> {
    info!("📜 Fetching activity history...");

    let raw = walk_pages(
        &ActivityPages { client, symbol },
        config.activity_page_size,
        Some(config.max_activity_pages),
    )
    .await;
    info!("  Total activities: {}", raw.len());

    raw.into_iter().filter_map(Activity::from_value).collect()
}

/// Listed tokens through the RPC-style query
pub async fn fetch_rpc_tokens(
    client: &MarketplaceClient,
    symbol: &str,
    config: &ScraperConfig,
) -> Vec<RpcToken> {
    info!("🛰️ Attempting to fetch tokens via ME RPC...");

    let raw = walk_pages(&RpcTokenPages { client, symbol }, config.rpc_page_size, None).await;
    let tokens: Vec<RpcToken> = raw.into_iter().filter_map(RpcToken::from_item).collect();
    info!("  RPC tokens: {}", tokens.len());
    tokens
}
