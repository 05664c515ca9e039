//! Mint-address aggregation
//!
//! Union of every mint seen in listings, RPC tokens and activities. The set
//! is ordered so the detail loop and everything downstream of it come out in
//! the same order on every run.

use std::collections::BTreeSet;
use tracing::info;

use crate::models::types::{Activity, Listing, RpcToken};

/// Deduplicated working set of mints to fetch. Each mint is fetched once.
pub fn collect_mints(listings: &[Listing], rpc_tokens: &[RpcToken], activities: &[Activity]) -> BTreeSet<String> {
    let from_listings = listings.iter().filter_map(|l| l.token_mint.as_deref());
    let from_rpc = rpc_tokens.iter().filter_map(RpcToken::mint);

    let mut mints: BTreeSet<String> = from_listings
        .chain(from_rpc)
        .filter(|mint| !mint.is_empty())
        .map(str::to_string)
        .collect();

    let activity_mints = mints_from_activities(activities);
    info!("  Found {} unique mints from activities", activity_mints.len());
    mints.extend(activity_mints);

    info!("🧮 Total unique mint addresses discovered: {}", mints.len());
    mints
}

/// Mints with any activity, listed or not
pub fn mints_from_activities(activities: &[Activity]) -> BTreeSet<String> {
    activities
        .iter()
        .filter_map(Activity::token_mint)
        .map(str::to_string)
        .collect()
}
