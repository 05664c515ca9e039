//! Holder distribution
//!
//! One pass over the NFT list groups mints by owner in discovery order,
//! then a stable descending sort by count ranks them. `top_holders` and
//! `all_holders` are both views of that one ranked sequence.

use std::collections::HashMap;
use tracing::info;

use crate::models::types::{Holder, HolderBuckets, HolderDistribution, HolderSummary, NftRecord};

/// Build the holder snapshot. NFTs without an owner are not counted.
pub fn compute_holder_distribution(nfts: &[NftRecord], top_n: usize) -> HolderDistribution {
    info!("👥 Computing holder distribution...");

    let mut holders: Vec<Holder> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for nft in nfts {
        let Some(owner) = nft.owner() else { continue };

        let slot = *index.entry(owner).or_insert_with(|| {
            holders.push(Holder {
                address: owner.to_string(),
                count: 0,
                nfts: Vec::new(),
            });
            holders.len() - 1
        });

        let holder = &mut holders[slot];
        holder.count += 1;
        holder.nfts.push(nft.mint_address().to_string());
    }

    // Stable: equal counts keep discovery order
    holders.sort_by(|a, b| b.count.cmp(&a.count));

    info!("  Unique holders: {}", holders.len());
    if let Some(top) = holders.first() {
        let short: String = top.address.chars().take(12).collect();
        info!("  Top holder: {}... with {} NFTs", short, top.count);
    }

    let mut distribution = HolderBuckets::default();
    for holder in &holders {
        add_to_bucket(&mut distribution, holder.count);
    }

    HolderDistribution {
        unique_holders: holders.len(),
        top_holders: holders.iter().take(top_n).cloned().collect(),
        distribution,
        all_holders: holders.iter().map(HolderSummary::from).collect(),
    }
}

/// Ranges: 1, 2-5, 6-10, 11-25, 26+. A count of 0 never reaches here.
fn add_to_bucket(buckets: &mut HolderBuckets, count: usize) {
    match count {
        0 | 1 => buckets.one += 1,
        2..=5 => buckets.two_to_five += 1,
        6..=10 => buckets.six_to_ten += 1,
        11..=25 => buckets.eleven_to_twenty_five += 1,
        _ => buckets.twenty_six_plus += 1,
    }
}
