//! Type definitions for the scraper
//!
//! Two families live here:
//! - `Raw*` structs mirror the marketplace responses. Every field is
//!   optional and identifiers are read leniently, so a missing or wrongly
//!   typed field becomes `None` at the deserialization boundary.
//! - Output entities (`CollectionStats`, `Listing`, `Activity`,
//!   `NftRecord`, `HolderDistribution`) serialize to the keys written in the
//!   result files.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::utils::constants::{lamports_to_sol, value_to_sol};

// ============================================
// LENIENT FIELD READERS
// ============================================

/// Accept only a JSON string; anything else (number, object, null) is `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accept a JSON number or a numeric string.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_of))
}

/// A JSON number, or a string holding one
fn number_of(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => serde_json::from_str::<Number>(s.trim()).ok(),
        _ => None,
    }
}

/// Response body that carries data: an object with at least one key.
///
/// `null`, `{}`, arrays and scalars all count as "nothing came back".
pub fn has_fields(body: &Value) -> bool {
    body.as_object().is_some_and(|fields| !fields.is_empty())
}

// ============================================
// RAW MARKETPLACE SCHEMAS
// ============================================

/// `GET /collections/{symbol}/stats`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCollectionStats {
    #[serde(deserialize_with = "lenient_number")]
    pub floor_price: Option<Number>,
    pub listed_count: Option<Value>,
    #[serde(rename = "avgPrice24hr", deserialize_with = "lenient_number")]
    pub avg_price_24hr: Option<Number>,
    #[serde(deserialize_with = "lenient_number")]
    pub volume_all: Option<Number>,
}

/// `GET /collections/{symbol}/listings` item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawListing {
    #[serde(deserialize_with = "lenient_string")]
    pub token_mint: Option<String>,
    pub token_address: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub seller: Option<String>,
    /// Display price (SOL) as sent by the listings endpoint
    pub price: Option<Value>,
    /// `{"solPrice": {"rawAmount": ...}}`, kept loose so a malformed
    /// price never costs the listing
    pub price_info: Option<Value>,
    pub auction_house: Option<Value>,
    pub seller_referral: Option<Value>,
    pub token_size: Option<Value>,
    pub expiry: Option<Value>,
    pub rarity: Option<Value>,
    pub extra: Option<Value>,
}

/// `GET /tokens/{mint}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTokenDetail {
    pub name: Option<Value>,
    pub image: Option<Value>,
    pub animation_url: Option<Value>,
    pub external_url: Option<Value>,
    pub collection: Option<Value>,
    pub collection_name: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub owner: Option<String>,
    pub supply: Option<Value>,
    pub delegate: Option<Value>,
    pub frozen: Option<Value>,
    pub listed: Option<Value>,
    pub list_status: Option<Value>,
    pub price: Option<Value>,
    pub update_authority: Option<Value>,
    pub seller_fee_basis_points: Option<Value>,
    pub primary_sale_happened: Option<Value>,
    pub token_standard: Option<Value>,
    pub attributes: Option<Value>,
    /// Off-chain metadata URI, when the endpoint exposes one
    #[serde(deserialize_with = "lenient_string")]
    pub uri: Option<String>,
}

impl RawListing {
    /// Lamport amount from `priceInfo.solPrice.rawAmount`
    pub fn raw_amount(&self) -> Option<Number> {
        self.price_info
            .as_ref()
            .and_then(|info| info.get("solPrice"))
            .and_then(|sol| sol.get("rawAmount"))
            .and_then(number_of)
    }
}

impl RawTokenDetail {
    /// Attribute objects as a list; anything that is not an array is empty
    pub fn attribute_list(&self) -> Vec<Value> {
        match &self.attributes {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}

// ============================================
// COLLECTION STATS
// ============================================

/// Collection-level snapshot, created once per run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectionStats {
    pub symbol: String,
    #[serde(rename = "floorPrice_lamports")]
    pub floor_price_lamports: Option<Number>,
    #[serde(rename = "floorPrice_SOL")]
    pub floor_price_sol: f64,
    #[serde(rename = "listedCount")]
    pub listed_count: Option<Value>,
    #[serde(rename = "avgPrice24hr_lamports")]
    pub avg_price_24hr_lamports: Option<Number>,
    #[serde(rename = "avgPrice24hr_SOL")]
    pub avg_price_24hr_sol: f64,
    #[serde(rename = "volumeAll_lamports")]
    pub volume_all_lamports: Option<Number>,
    #[serde(rename = "volumeAll_SOL")]
    pub volume_all_sol: f64,
    /// RFC 3339, UTC
    pub fetched_at: String,
}

impl CollectionStats {
    pub fn from_raw(symbol: &str, raw: RawCollectionStats, fetched_at: String) -> Self {
        Self {
            symbol: symbol.to_string(),
            floor_price_sol: lamports_to_sol(raw.floor_price.as_ref()),
            floor_price_lamports: raw.floor_price,
            listed_count: raw.listed_count,
            avg_price_24hr_sol: lamports_to_sol(raw.avg_price_24hr.as_ref()),
            avg_price_24hr_lamports: raw.avg_price_24hr,
            volume_all_sol: lamports_to_sol(raw.volume_all.as_ref()),
            volume_all_lamports: raw.volume_all,
            fetched_at,
        }
    }
}

// ============================================
// LISTINGS
// ============================================

/// One currently-for-sale token
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Listing {
    #[serde(rename = "tokenMint")]
    pub token_mint: Option<String>,
    #[serde(rename = "tokenAddress")]
    pub token_address: Option<Value>,
    pub seller: Option<String>,
    #[serde(rename = "price_SOL")]
    pub price_sol: f64,
    #[serde(rename = "price_lamports")]
    pub price_lamports: Option<Number>,
    #[serde(rename = "auctionHouse")]
    pub auction_house: Option<Value>,
    #[serde(rename = "sellerReferral")]
    pub seller_referral: Option<Value>,
    #[serde(rename = "tokenSize")]
    pub token_size: Option<Value>,
    pub expiry: Option<Value>,
    pub rarity: Value,
    pub extra: Value,
}

impl From<RawListing> for Listing {
    fn from(raw: RawListing) -> Self {
        let price_lamports = raw.raw_amount();

        // Listings quote SOL directly; fall back to the raw lamport amount.
        let price_sol = match raw.price.as_ref().and_then(Value::as_f64) {
            Some(sol) => sol,
            None => lamports_to_sol(price_lamports.as_ref()),
        };

        Self {
            token_mint: raw.token_mint,
            token_address: raw.token_address,
            seller: raw.seller,
            price_sol,
            price_lamports,
            auction_house: raw.auction_house,
            seller_referral: raw.seller_referral,
            token_size: raw.token_size,
            expiry: raw.expiry,
            rarity: raw.rarity.unwrap_or_else(|| Value::Object(Map::new())),
            extra: raw.extra.unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}

// ============================================
// ACTIVITIES
// ============================================

/// Marketplace event, passed through opaquely plus a derived `price_SOL`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Activity(Map<String, Value>);

impl Activity {
    /// Wrap an event object. Non-objects are rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(mut fields) => {
                let price_sol = value_to_sol(fields.get("price"));
                fields.insert("price_SOL".to_string(), Value::from(price_sol));
                Some(Self(fields))
            }
            _ => None,
        }
    }

    pub fn token_mint(&self) -> Option<&str> {
        self.0.get("tokenMint").and_then(Value::as_str).filter(|m| !m.is_empty())
    }

    pub fn price_sol(&self) -> f64 {
        self.0.get("price_SOL").and_then(Value::as_f64).unwrap_or(0.0)
    }
}

// ============================================
// RPC TOKENS
// ============================================

/// Item of the RPC-style listed-NFT query
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct RpcToken(Map<String, Value>);

impl RpcToken {
    /// Objects pass through; a bare string is treated as a mint address.
    pub fn from_item(item: Value) -> Option<Self> {
        match item {
            Value::Object(fields) => Some(Self(fields)),
            Value::String(mint) => {
                let mut fields = Map::new();
                fields.insert("mintAddress".to_string(), Value::String(mint));
                Some(Self(fields))
            }
            _ => None,
        }
    }

    /// `mintAddress`, else `tokenMint`
    pub fn mint(&self) -> Option<&str> {
        ["mintAddress", "tokenMint"]
            .iter()
            .filter_map(|key| self.0.get(*key).and_then(Value::as_str))
            .find(|mint| !mint.is_empty())
    }
}

// ============================================
// NFTS
// ============================================

/// Successfully fetched NFT with flattened traits
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NftDetail {
    #[serde(rename = "mintAddress")]
    pub mint_address: String,
    pub name: Option<Value>,
    pub image: Option<Value>,
    #[serde(rename = "animationUrl")]
    pub animation_url: Option<Value>,
    #[serde(rename = "externalUrl")]
    pub external_url: Option<Value>,
    pub collection: Option<Value>,
    #[serde(rename = "collectionName")]
    pub collection_name: Option<Value>,
    pub owner: Option<String>,
    pub supply: Option<Value>,
    pub delegate: Option<Value>,
    pub frozen: Option<Value>,
    pub listed: Option<Value>,
    #[serde(rename = "listStatus")]
    pub list_status: Option<Value>,
    #[serde(rename = "price_SOL")]
    pub price_sol: Option<Value>,
    #[serde(rename = "updateAuthority")]
    pub update_authority: Option<Value>,
    #[serde(rename = "sellerFeeBasisPoints")]
    pub seller_fee_basis_points: Option<Value>,
    #[serde(rename = "primarySaleHappened")]
    pub primary_sale_happened: Option<Value>,
    #[serde(rename = "tokenStandard")]
    pub token_standard: Option<Value>,
    pub attributes: Vec<Value>,
    pub trait_count: usize,
    /// `trait_<type>` -> value
    #[serde(flatten)]
    pub traits: BTreeMap<String, Value>,
}

/// Placeholder for a mint whose detail fetch gave nothing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailedNft {
    #[serde(rename = "mintAddress")]
    pub mint_address: String,
    pub error: String,
}

/// One entry of the NFT list. Failed fetches are kept, never dropped.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum NftRecord {
    Fetched(Box<NftDetail>),
    Failed(FailedNft),
}

impl NftRecord {
    pub fn mint_address(&self) -> &str {
        match self {
            Self::Fetched(nft) => &nft.mint_address,
            Self::Failed(nft) => &nft.mint_address,
        }
    }

    /// Current owner, if known and non-empty
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Fetched(nft) => nft.owner.as_deref().filter(|o| !o.is_empty()),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Flat key/value view, identical to the JSON object written for it
    pub fn to_row(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(row)) => row,
            _ => {
                let mut row = Map::new();
                row.insert("mintAddress".to_string(), Value::String(self.mint_address().to_string()));
                row
            }
        }
    }
}

// ============================================
// HOLDERS
// ============================================

/// An owner and the mints it holds within the scraped set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Holder {
    pub address: String,
    pub count: usize,
    pub nfts: Vec<String>,
}

/// Holder row of the full ranked list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HolderSummary {
    pub address: String,
    pub count: usize,
}

impl From<&Holder> for HolderSummary {
    fn from(holder: &Holder) -> Self {
        Self {
            address: holder.address.clone(),
            count: holder.count,
        }
    }
}

/// Holder counts by ownership size (inclusive, non-overlapping ranges)
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct HolderBuckets {
    #[serde(rename = "1_nft")]
    pub one: usize,
    #[serde(rename = "2_5_nfts")]
    pub two_to_five: usize,
    #[serde(rename = "6_10_nfts")]
    pub six_to_ten: usize,
    #[serde(rename = "11_25_nfts")]
    pub eleven_to_twenty_five: usize,
    #[serde(rename = "26_plus_nfts")]
    pub twenty_six_plus: usize,
}

impl HolderBuckets {
    pub fn total(&self) -> usize {
        self.one + self.two_to_five + self.six_to_ten + self.eleven_to_twenty_five + self.twenty_six_plus
    }
}

/// Holder snapshot, recomputed from scratch every run
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct HolderDistribution {
    pub unique_holders: usize,
    pub top_holders: Vec<Holder>,
    pub distribution: HolderBuckets,
    pub all_holders: Vec<HolderSummary>,
}
