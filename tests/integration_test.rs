//! Integration tests for the marketplace client, pagination and symbol
//! resolution against a local mock server

use gorbagios_scraper::core::{
    fetch_activities, fetch_all_listings, fetch_collection_stats, fetch_nft, fetch_rpc_tokens,
};
use gorbagios_scraper::{MarketplaceClient, ScraperConfig, SymbolResolver};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> ScraperConfig {
    ScraperConfig::default()
        .with_api_base(format!("{}/v2", server.uri()))
        .with_rpc_base(format!("{}/rpc", server.uri()))
        .without_delays()
}

fn client_for(server: &MockServer) -> MarketplaceClient {
    MarketplaceClient::new(&test_config(server)).unwrap()
}

fn listings(range: std::ops::Range<usize>) -> Value {
    Value::Array(range.map(|i| json!({ "tokenMint": format!("Mint{}", i), "price": 1.0 })).collect())
}

// ============================================
// RETRY HARNESS
// ============================================

#[tokio::test]
async fn test_server_error_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/stats"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.collection_stats("gorbagio").await.is_none());
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/tokens/MissingMint"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.token_detail("MissingMint").await.is_none());
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/stats"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "floorPrice": 1_000_000_000u64 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = client.collection_stats("gorbagio").await.unwrap();
    assert_eq!(body["floorPrice"], json!(1_000_000_000u64));
}

#[tokio::test]
async fn test_persistent_rate_limit_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/activities"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.activities_page("gorbagio", 0, 100).await.is_none());
}

#[tokio::test]
async fn test_invalid_json_body_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.collection_stats("gorbagio").await.is_none());
}

#[tokio::test]
async fn test_client_sends_identifying_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/stats"))
        .and(wiremock::matchers::header("user-agent", "GorbagiosScraper/1.0"))
        .and(wiremock::matchers::header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.collection_stats("gorbagio").await, Some(json!({})));
}

// ============================================
// EMPTY BODIES
// ============================================

#[tokio::test]
async fn test_empty_stats_body_counts_as_failed_fetch() {
    for body in [json!({}), json!([])] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/collections/gorbagio/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(fetch_collection_stats(&client, "gorbagio").await.is_none());
    }
}

#[tokio::test]
async fn test_empty_detail_body_yields_failed_record() {
    for body in [json!({}), json!([])] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/tokens/MintE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let record = fetch_nft(&client, "MintE").await;
        assert!(record.is_failed());
        assert_eq!(record.to_row()["error"], json!("failed to fetch"));
    }
}

// ============================================
// PAGINATION
// ============================================

#[tokio::test]
async fn test_listings_walk_stops_after_short_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/listings"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings(0..20)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/listings"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings(20..25)))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = MarketplaceClient::new(&config).unwrap();
    let result = fetch_all_listings(&client, "gorbagio", &config).await;

    assert_eq!(result.len(), 25);
    assert_eq!(result[0].token_mint.as_deref(), Some("Mint0"));
    assert_eq!(result[24].token_mint.as_deref(), Some("Mint24"));
}

#[tokio::test]
async fn test_listings_walk_stops_on_failed_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/listings"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings(0..20)))
        .mount(&server)
        .await;
    // offset=20 is unmatched -> 404 -> walk ends with what it has

    let config = test_config(&server);
    let client = MarketplaceClient::new(&config).unwrap();
    assert_eq!(fetch_all_listings(&client, "gorbagio", &config).await.len(), 20);
}

#[tokio::test]
async fn test_listing_with_malformed_price_info_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/listings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "tokenMint": "MintA", "priceInfo": { "solPrice": "1.5" } },
            { "tokenMint": "MintB", "priceInfo": "n/a" },
            { "tokenMint": "MintC" },
            "not a listing"
        ])))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = MarketplaceClient::new(&config).unwrap();
    let result = fetch_all_listings(&client, "gorbagio", &config).await;

    let mints: Vec<&str> = result.iter().filter_map(|l| l.token_mint.as_deref()).collect();
    assert_eq!(mints, vec!["MintA", "MintB", "MintC"]);
}

#[tokio::test]
async fn test_activity_walk_respects_page_cap() {
    let server = MockServer::start().await;
    let full_page: Value = Value::Array(
        (0..100)
            .map(|i| json!({ "type": "buyNow", "tokenMint": format!("M{}", i), "price": 500_000_000u64 }))
            .collect(),
    );
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_page))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.max_activity_pages = 2;
    let client = MarketplaceClient::new(&config).unwrap();
    let activities = fetch_activities(&client, "gorbagio", &config).await;

    assert_eq!(activities.len(), 200);
    assert_eq!(activities[0].price_sol(), 0.5);
}

#[tokio::test]
async fn test_rpc_tokens_accept_results_wrapper() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rpc/getListedNFTsByQuery"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": ["MintS", { "mintAddress": "MintO" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = MarketplaceClient::new(&config).unwrap();
    let tokens = fetch_rpc_tokens(&client, "gorbagio", &config).await;

    let mints: Vec<&str> = tokens.iter().filter_map(|t| t.mint()).collect();
    assert_eq!(mints, vec!["MintS", "MintO"]);
}

// ============================================
// SYMBOL RESOLUTION
// ============================================

#[tokio::test]
async fn test_resolver_accepts_first_candidate_with_floor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "floorPrice": 0 })))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = MarketplaceClient::new(&config).unwrap();
    let resolution = SymbolResolver::from_config(&config).resolve(&client).await.unwrap();

    assert_eq!(resolution.symbol, "gorbagio");
    assert_eq!(resolution.strategy, "candidates");
}

#[tokio::test]
async fn test_resolver_accepts_candidate_with_listings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagio/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "floorPrice": null })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/collections/gorbagios/listings"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings(0..1)))
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.symbol_candidates = vec!["gorbagio".into(), "gorbagios".into()];
    let client = MarketplaceClient::new(&config).unwrap();
    let resolution = SymbolResolver::from_config(&config).resolve(&client).await.unwrap();

    assert_eq!(resolution.symbol, "gorbagios");
    assert_eq!(resolution.strategy, "candidates");
}

#[tokio::test]
async fn test_resolver_falls_back_to_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/collections"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Okay Bears", "symbol": "okay_bears" },
            { "name": "Gorbagios Official", "symbol": "gorbagios_official" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = MarketplaceClient::new(&config).unwrap();
    let resolution = SymbolResolver::from_config(&config).resolve(&client).await.unwrap();

    assert_eq!(resolution.symbol, "gorbagios_official");
    assert_eq!(resolution.strategy, "search");
}

#[tokio::test]
async fn test_resolver_defaults_when_nothing_matches() {
    // Nothing mounted: every lookup is a 404
    let server = MockServer::start().await;

    let config = test_config(&server);
    let client = MarketplaceClient::new(&config).unwrap();
    let resolution = SymbolResolver::from_config(&config).resolve(&client).await.unwrap();

    assert_eq!(resolution.symbol, "gorbagios");
    assert_eq!(resolution.strategy, "fallback");
}
