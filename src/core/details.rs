//! Per-mint detail fetch
//!
//! Strictly sequential: one token-detail request per mint through the shared
//! retry harness. A mint whose fetch yields nothing is kept as a degenerate
//! `FailedNft` record.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::models::types::{has_fields, FailedNft, NftDetail, NftRecord, RawTokenDetail};
use crate::providers::MarketplaceClient;
use crate::utils::constants::{DETAIL_PROGRESS_EVERY, FETCH_FAILED_MARKER, TRAIT_PREFIX, UNKNOWN_TRAIT};

/// Column name reserved by `NftDetail::trait_count`
const TRAIT_COUNT_KEY: &str = "trait_count";

/// Fetch details for every mint, in set order
pub async fn fetch_all_nft_details(client: &MarketplaceClient, mints: &BTreeSet<String>) -> Vec<NftRecord> {
    info!("🖼️ Fetching detailed metadata for {} NFTs...", mints.len());
    let mut nfts = Vec::with_capacity(mints.len());

    for (i, mint) in mints.iter().enumerate() {
        nfts.push(fetch_nft(client, mint).await);

        if (i + 1) % DETAIL_PROGRESS_EVERY == 0 {
            info!("  NFT metadata: {}/{}", i + 1, mints.len());
        }
    }

    let failed = nfts.iter().filter(|n| n.is_failed()).count();
    info!("  Fetched metadata for {} NFTs ({} failed)", nfts.len(), failed);
    nfts
}

/// Fetch and flatten one mint
pub async fn fetch_nft(client: &MarketplaceClient, mint: &str) -> NftRecord {
    let raw = match client.token_detail(mint).await {
        Some(body) if has_fields(&body) => serde_json::from_value::<RawTokenDetail>(body).ok(),
        _ => None,
    };
    let Some(raw) = raw else {
        return failed(mint);
    };

    let mut attributes = raw.attribute_list();
    if attributes.is_empty() {
        if let Some(uri) = raw.uri.as_deref() {
            attributes = offchain_attributes(client, uri).await;
        }
    }

    NftRecord::Fetched(Box::new(build_nft(mint, raw, attributes)))
}

fn failed(mint: &str) -> NftRecord {
    debug!("Detail fetch failed for {}", mint);
    NftRecord::Failed(FailedNft {
        mint_address: mint.to_string(),
        error: FETCH_FAILED_MARKER.to_string(),
    })
}

/// Attribute list from the off-chain metadata blob, empty on any failure
async fn offchain_attributes(client: &MarketplaceClient, uri: &str) -> Vec<Value> {
    client
        .offchain_metadata(uri)
        .await
        .and_then(|blob| blob.get("attributes").and_then(Value::as_array).cloned())
        .unwrap_or_default()
}

/// Assemble the output record from the raw detail and its attributes
pub fn build_nft(mint: &str, raw: RawTokenDetail, attributes: Vec<Value>) -> NftDetail {
    let traits = flatten_traits(&attributes);

    NftDetail {
        mint_address: mint.to_string(),
        name: raw.name,
        image: raw.image,
        animation_url: raw.animation_url,
        external_url: raw.external_url,
        collection: raw.collection,
        collection_name: raw.collection_name,
        owner: raw.owner,
        supply: raw.supply,
        delegate: raw.delegate,
        frozen: raw.frozen,
        listed: raw.listed,
        list_status: raw.list_status,
        price_sol: raw.price,
        update_authority: raw.update_authority,
        seller_fee_basis_points: raw.seller_fee_basis_points,
        primary_sale_happened: raw.primary_sale_happened,
        token_standard: raw.token_standard,
        trait_count: attributes.len(),
        attributes,
        traits,
    }
}

/// `trait_<type>` -> value for every attribute object.
///
/// Duplicate trait types keep the last value; the full list stays in
/// `attributes`. Non-object attributes are ignored.
pub fn flatten_traits(attributes: &[Value]) -> BTreeMap<String, Value> {
    let mut traits = BTreeMap::new();

    for attr in attributes.iter().filter_map(Value::as_object) {
        let key = trait_key(attr.get("trait_type"));
        let value = attr.get("value").cloned().unwrap_or_else(|| Value::String(String::new()));
        traits.insert(key, value);
    }

    traits
}

fn trait_key(trait_type: Option<&Value>) -> String {
    let name = match trait_type {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => UNKNOWN_TRAIT.to_string(),
        Some(other) => other.to_string(),
    };

    let key = format!("{}{}", TRAIT_PREFIX, name);
    if key == TRAIT_COUNT_KEY {
        format!("{}_trait", key)
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_traits() {
        let attributes = vec![
            json!({ "trait_type": "Background", "value": "Dumpster" }),
            json!({ "trait_type": "Eyes", "value": "Laser" }),
            json!({ "value": "mystery" }),
        ];
        let traits = flatten_traits(&attributes);

        assert_eq!(traits["trait_Background"], json!("Dumpster"));
        assert_eq!(traits["trait_Eyes"], json!("Laser"));
        assert_eq!(traits["trait_unknown"], json!("mystery"));
        assert_eq!(traits.len(), 3);
    }

    #[test]
    fn test_duplicate_trait_type_last_write_wins() {
        let attributes = vec![
            json!({ "trait_type": "Hat", "value": "Cap" }),
            json!({ "trait_type": "Hat", "value": "Crown" }),
        ];
        let traits = flatten_traits(&attributes);
        assert_eq!(traits.len(), 1);
        assert_eq!(traits["trait_Hat"], json!("Crown"));
    }

    #[test]
    fn test_missing_value_and_odd_types() {
        let attributes = vec![
            json!({ "trait_type": "Level" }),
            json!({ "trait_type": 7, "value": 1 }),
            json!("not an attribute"),
        ];
        let traits = flatten_traits(&attributes);
        assert_eq!(traits["trait_Level"], json!(""));
        assert_eq!(traits["trait_7"], json!(1));
        assert_eq!(traits.len(), 2);
    }

    #[test]
    fn test_trait_count_collision() {
        let traits = flatten_traits(&[json!({ "trait_type": "count", "value": 3 })]);
        assert_eq!(traits["trait_count_trait"], json!(3));
        assert!(!traits.contains_key("trait_count"));
    }

    #[test]
    fn test_build_nft_row() {
        let raw: RawTokenDetail = serde_json::from_value(json!({
            "name": "Gorbagio #1",
            "owner": "OwnerA",
            "sellerFeeBasisPoints": 500,
            "tokenStandard": 4,
            "attributes": [{ "trait_type": "Bin", "value": "Green" }]
        }))
        .unwrap();
        let attributes = raw.attribute_list();
        let nft = build_nft("Mint1", raw, attributes);

        assert_eq!(nft.trait_count, 1);
        let row = NftRecord::Fetched(Box::new(nft)).to_row();
        assert_eq!(row["mintAddress"], json!("Mint1"));
        assert_eq!(row["owner"], json!("OwnerA"));
        assert_eq!(row["sellerFeeBasisPoints"], json!(500));
        assert_eq!(row["trait_Bin"], json!("Green"));
        assert_eq!(row["trait_count"], json!(1));
        assert_eq!(row["image"], Value::Null);
    }
}
