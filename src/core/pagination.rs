//! Offset/limit pagination
//!
//! Every paginated endpoint is walked the same way: start at offset 0,
//! advance by the number of items actually returned, stop on an empty page,
//! on a page shorter than requested, or after `max_pages`.

use serde_json::Value;
use tracing::info;

use crate::providers::MarketplaceClient;

/// A remote endpoint that can be read one page at a time.
///
/// `None` means the request produced no data (absence, exhausted retries or
/// an unexpected body shape); the walker stops on it.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Plural noun used in progress logs
    fn label(&self) -> &str;

    async fn fetch_page(&self, offset: usize, limit: usize) -> Option<Vec<Value>>;
}

/// Walk `source` until the data runs out.
pub async fn walk_pages<S: PageSource>(source: &S, page_size: usize, max_pages: Option<usize>) -> Vec<Value> {
    let mut items = Vec::new();
    let mut offset = 0;
    let mut pages = 0;

    while max_pages.map_or(true, |max| pages < max) {
        let page = match source.fetch_page(offset, page_size).await {
            Some(page) if !page.is_empty() => page,
            _ => break,
        };
        pages += 1;

        let returned = page.len();
        items.extend(page);
        offset += returned;
        info!("  Fetched {} {} so far...", items.len(), source.label());

        if returned < page_size {
            break;
        }
    }

    items
}

fn into_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

// ============================================
// MARKETPLACE PAGE SOURCES
// ============================================

/// `/collections/{symbol}/listings`
pub struct ListingPages<'a> {
    pub client: &'a MarketplaceClient,
    pub symbol: &'a str,
}

impl PageSource for ListingPages<'_> {
    fn label(&self) -> &str {
        "listings"
    }

    async fn fetch_page(&self, offset: usize, limit: usize) -> Option<Vec<Value>> {
        self.client.listings_page(self.symbol, offset, limit).await.and_then(into_array)
    }
}

/// `/collections/{symbol}/activities`
pub struct ActivityPages<'a> {
    pub client: &'a MarketplaceClient,
    pub symbol: &'a str,
}

impl PageSource for ActivityPages<'_> {
    fn label(&self) -> &str {
        "activities"
    }

    async fn fetch_page(&self, offset: usize, limit: usize) -> Option<Vec<Value>> {
        self.client.activities_page(self.symbol, offset, limit).await.and_then(into_array)
    }
}

/// RPC-style listed-NFT query. Answers either `{"results": [...]}` or a bare array.
pub struct RpcTokenPages<'a> {
    pub client: &'a MarketplaceClient,
    pub symbol: &'a str,
}

impl PageSource for RpcTokenPages<'_> {
    fn label(&self) -> &str {
        "RPC tokens"
    }

    async fn fetch_page(&self, offset: usize, limit: usize) -> Option<Vec<Value>> {
        let body = self.client.listed_nfts_by_query(self.symbol, offset, limit).await?;
        unwrap_results(body)
    }
}

/// Unwrap the RPC-style results wrapper
pub fn unwrap_results(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Object(mut fields) => fields.remove("results").and_then(into_array),
        other => into_array(other),
    }
}
