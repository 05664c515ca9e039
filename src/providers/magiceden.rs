//! Magic Eden API Client
//!
//! One `MarketplaceClient` is built per run and handed to every stage. It
//! owns the retry / rate-limit harness:
//!
//! - a fixed courtesy pause before every attempt
//! - 200 -> parsed JSON body
//! - 404 -> "no data" at once (no backoff, no retry)
//! - 429 -> wait `backoff_base * 2^attempt`, retry
//! - other status -> wait `backoff_base`, retry
//! - network error / undecodable body -> wait `backoff_base * 2^attempt`, retry
//!
//! After `max_retries` attempts the request yields `None`. Callers treat
//! `None` as "stop", never as an error.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::config::{RetryPolicy, ScraperConfig};
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::USER_AGENT as USER_AGENT_CONST;

/// Query string parameters
pub type Params<'a> = [(&'a str, String)];

/// HTTP client for the marketplace REST and RPC-style endpoints
#[derive(Clone)]
pub struct MarketplaceClient {
    client: reqwest::Client,
    api_base: String,
    rpc_base: String,
    retry: RetryPolicy,
    offchain_delay: Duration,
    offchain_timeout: Duration,
}

impl MarketplaceClient {
    pub fn new(config: &ScraperConfig) -> AppResult<Self> {
        Ok(Self {
            client: Self::build_client()?,
            api_base: config.api_base.clone(),
            rpc_base: config.rpc_base.clone(),
            retry: config.retry,
            offchain_delay: config.offchain_delay,
            offchain_timeout: config.offchain_timeout,
        })
    }

    fn build_client() -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| AppError::with_source(ErrorCode::Unknown, "Failed to build HTTP client", e))
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    // ============================================
    // RETRY HARNESS
    // ============================================

    /// GET with the client's retry policy
    pub async fn get_json(&self, url: &str, params: &Params<'_>) -> Option<Value> {
        self.get_with_policy(url, params, &self.retry).await
    }

    /// GET with an explicit retry policy
    pub async fn get_with_policy(
        &self,
        url: &str,
        params: &Params<'_>,
        policy: &RetryPolicy,
    ) -> Option<Value> {
        for attempt in 0..policy.max_retries {
            if !policy.request_delay.is_zero() {
                tokio::time::sleep(policy.request_delay).await;
            }

            let err = match self.try_get(url, params, policy.timeout).await {
                Ok(body) => return Some(body),
                Err(e) => e,
            };

            let wait = match err.code.backoff(policy.backoff_base, attempt) {
                Some(wait) => wait,
                None => {
                    debug!("🔎 {} - no data", err);
                    return None;
                }
            };

            match err.code {
                ErrorCode::HttpRateLimited => {
                    warn!("⏳ Rate limited, waiting {:?}... ({})", wait, url)
                }
                ErrorCode::HttpStatus => warn!("⚠️ {}", err.message),
                _ => warn!("⚠️ Request error (attempt {}): {}", attempt + 1, err),
            }

            if attempt + 1 < policy.max_retries {
                tokio::time::sleep(wait).await;
            }
        }

        warn!("❌ Giving up on {} after {} attempts", url, policy.max_retries);
        None
    }

    /// Single attempt, with the response status mapped onto an error code
    async fn try_get(&self, url: &str, params: &Params<'_>, timeout: Duration) -> AppResult<Value> {
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => Ok(response.json::<Value>().await?),
            429 => Err(AppError::rate_limited()),
            404 => Err(AppError::not_found(url)),
            status => Err(AppError::http_status(status, url)),
        }
    }

    // ============================================
    // ENDPOINTS
    // ============================================

    /// `/collections/{symbol}/stats`
    pub async fn collection_stats(&self, symbol: &str) -> Option<Value> {
        let url = format!("{}/collections/{}/stats", self.api_base, symbol);
        self.get_json(&url, &[]).await
    }

    /// `/collections/{symbol}/listings?offset&limit`
    pub async fn listings_page(&self, symbol: &str, offset: usize, limit: usize) -> Option<Value> {
        let url = format!("{}/collections/{}/listings", self.api_base, symbol);
        self.get_json(&url, &page_params(offset, limit)).await
    }

    /// `/collections/{symbol}/activities?offset&limit`
    pub async fn activities_page(&self, symbol: &str, offset: usize, limit: usize) -> Option<Value> {
        let url = format!("{}/collections/{}/activities", self.api_base, symbol);
        self.get_json(&url, &page_params(offset, limit)).await
    }

    /// `/collections?offset&limit` (collection directory used for search)
    pub async fn collections_page(&self, offset: usize, limit: usize) -> Option<Value> {
        let url = format!("{}/collections", self.api_base);
        self.get_json(&url, &page_params(offset, limit)).await
    }

    /// `/tokens/{mint}`
    pub async fn token_detail(&self, mint: &str) -> Option<Value> {
        let url = format!("{}/tokens/{}", self.api_base, mint);
        self.get_json(&url, &[]).await
    }

    /// RPC-style `getListedNFTsByQuery`, newest first
    pub async fn listed_nfts_by_query(&self, symbol: &str, skip: usize, limit: usize) -> Option<Value> {
        let url = format!("{}/getListedNFTsByQuery", self.rpc_base);
        let query = json!({
            "$match": { "collectionSymbol": symbol },
            "$sort": { "createdAt": -1 },
            "$skip": skip,
            "$limit": limit,
        });
        self.get_json(&url, &[("q", query.to_string())]).await
    }

    // ============================================
    // OFF-CHAIN METADATA
    // ============================================

    /// Best-effort fetch of an off-chain metadata blob.
    ///
    /// One attempt, no retry; every failure is swallowed.
    pub async fn offchain_metadata(&self, uri: &str) -> Option<Value> {
        if uri.trim().is_empty() {
            return None;
        }

        if !self.offchain_delay.is_zero() {
            tokio::time::sleep(self.offchain_delay).await;
        }

        let response = match self.client.get(uri).timeout(self.offchain_timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Off-chain metadata unavailable ({}): {}", uri, e);
                return None;
            }
        };

        if response.status().as_u16() != 200 {
            debug!("Off-chain metadata HTTP {} for {}", response.status(), uri);
            return None;
        }

        response.json::<Value>().await.ok()
    }
}

fn page_params(offset: usize, limit: usize) -> Vec<(&'static str, String)> {
    vec![("offset", offset.to_string()), ("limit", limit.to_string())]
}
