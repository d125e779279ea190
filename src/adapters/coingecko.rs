//! CoinGecko REST adapter.
//!
//! Thin typed wrapper over the three public v3 endpoints the tool uses:
//! /simple/price, /coins/markets and /search. No authentication and no
//! retries; every failure is classified into `TrackError`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::QuoteSource;
use crate::config::ApiConfig;
use crate::domain::{AssetQuote, MarketEntry, SearchResult};
use crate::error::{Result, TrackError};

/// Maximum number of search matches surfaced to the user
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// One asset's numeric fields from /simple/price. Keys are
/// `<vs_currency>`-prefixed names plus `last_updated_at` (unix seconds).
type PricePoint = HashMap<String, f64>;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchResult>,
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("cryptotrack/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            vs_currency: cfg.vs_currency.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let resp = self.http.get(&url).query(query).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status.as_u16() == 429 {
            return Err(TrackError::Network(format!(
                "rate limited by the API for GET {path}"
            )));
        }

        if !status.is_success() {
            return Err(TrackError::Network(format!(
                "GET {} failed: status={} body={}",
                path,
                status,
                excerpt(&text)
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| TrackError::Network(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl QuoteSource for CoinGeckoClient {
    async fn fetch_quote(&self, asset_id: &str) -> Result<AssetQuote> {
        let asset_id = asset_id.trim().to_lowercase();
        if asset_id.is_empty() {
            return Err(TrackError::InvalidInput(
                "asset id must not be empty".to_string(),
            ));
        }

        let query = [
            ("ids", asset_id.clone()),
            ("vs_currencies", self.vs_currency.clone()),
            ("include_24hr_change", "true".to_string()),
            ("include_market_cap", "true".to_string()),
            ("include_24hr_vol", "true".to_string()),
            ("include_last_updated_at", "true".to_string()),
        ];
        let value = self.get_json("/simple/price", &query).await?;
        let payload: HashMap<String, PricePoint> = serde_json::from_value(value)
            .map_err(|e| TrackError::Network(format!("invalid JSON response: {e}")))?;

        quote_from_payload(&asset_id, &self.vs_currency, &payload)
    }

    async fn fetch_top_markets(&self, limit: u32) -> Result<Vec<MarketEntry>> {
        if limit == 0 {
            return Err(TrackError::InvalidInput(
                "market count must be a positive integer".to_string(),
            ));
        }

        let query = [
            ("vs_currency", self.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", limit.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
        ];
        let value = self.get_json("/coins/markets", &query).await?;

        // Rows arrive ranked by the API; order is kept as-is.
        serde_json::from_value(value)
            .map_err(|e| TrackError::Network(format!("invalid JSON response: {e}")))
    }

    async fn search(&self, query_text: &str) -> Result<Vec<SearchResult>> {
        let q = query_text.trim();
        if q.is_empty() {
            return Err(TrackError::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }

        let value = self.get_json("/search", &[("query", q.to_string())]).await?;
        let resp: SearchResponse = serde_json::from_value(value)
            .map_err(|e| TrackError::Network(format!("invalid JSON response: {e}")))?;

        Ok(truncate_matches(resp.coins))
    }
}

/// Build a quote out of the dynamic-keyed simple-price payload.
///
/// Unknown ids do not produce an HTTP error upstream; they are simply
/// missing from the object, which classifies as NotFound here. An entry
/// without the quote-currency price counts as missing too.
fn quote_from_payload(
    asset_id: &str,
    vs: &str,
    payload: &HashMap<String, PricePoint>,
) -> Result<AssetQuote> {
    let point = payload
        .get(asset_id)
        .ok_or_else(|| TrackError::NotFound(asset_id.to_string()))?;
    let price = point
        .get(vs)
        .copied()
        .ok_or_else(|| TrackError::NotFound(asset_id.to_string()))?;

    let change_24h = point
        .get(&format!("{vs}_24h_change"))
        .copied()
        .unwrap_or(0.0);
    let market_cap = point.get(&format!("{vs}_market_cap")).copied();
    let volume_24h = point.get(&format!("{vs}_24h_vol")).copied();
    let last_updated = point
        .get("last_updated_at")
        .and_then(|secs| DateTime::<Utc>::from_timestamp(*secs as i64, 0));

    Ok(AssetQuote {
        id: asset_id.to_string(),
        price,
        change_24h,
        market_cap,
        volume_24h,
        last_updated,
    })
}

fn truncate_matches(mut coins: Vec<SearchResult>) -> Vec<SearchResult> {
    coins.truncate(SEARCH_RESULT_LIMIT);
    coins
}

fn excerpt(text: &str) -> String {
    text.trim().chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(pairs: &[(&str, f64)]) -> PricePoint {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn quote_from_payload_maps_all_fields() {
        let mut payload = HashMap::new();
        payload.insert(
            "bitcoin".to_string(),
            point(&[
                ("usd", 43521.5),
                ("usd_24h_change", 2.34),
                ("usd_market_cap", 850_000_000_000.0),
                ("usd_24h_vol", 23_000_000_000.0),
                ("last_updated_at", 1_700_000_000.0),
            ]),
        );

        let quote = quote_from_payload("bitcoin", "usd", &payload).expect("quote should parse");
        assert_eq!(quote.id, "bitcoin");
        assert_eq!(quote.price, 43521.5);
        assert_eq!(quote.change_24h, 2.34);
        assert_eq!(quote.market_cap, Some(850_000_000_000.0));
        assert_eq!(quote.volume_24h, Some(23_000_000_000.0));
        assert!(quote.last_updated.is_some());
    }

    #[test]
    fn missing_id_is_not_found_rather_than_network() {
        let payload: HashMap<String, PricePoint> = HashMap::new();

        let err = quote_from_payload("dogecoin", "usd", &payload).unwrap_err();
        assert!(matches!(err, TrackError::NotFound(_)));
    }

    #[test]
    fn partial_object_without_price_is_not_found() {
        let mut payload = HashMap::new();
        payload.insert("bitcoin".to_string(), point(&[("last_updated_at", 1.0)]));

        let err = quote_from_payload("bitcoin", "usd", &payload).unwrap_err();
        assert!(matches!(err, TrackError::NotFound(_)));
    }

    #[test]
    fn missing_change_defaults_to_zero() {
        let mut payload = HashMap::new();
        payload.insert("tether".to_string(), point(&[("usd", 1.0)]));

        let quote = quote_from_payload("tether", "usd", &payload).expect("quote should parse");
        assert_eq!(quote.change_24h, 0.0);
        assert_eq!(quote.market_cap, None);
        assert_eq!(quote.last_updated, None);
    }

    #[test]
    fn search_matches_cap_at_ten_in_order() {
        let coins: Vec<SearchResult> = (0..15)
            .map(|i| SearchResult {
                id: format!("coin-{i}"),
                symbol: format!("C{i}"),
                name: format!("Coin {i}"),
            })
            .collect();

        let kept = truncate_matches(coins);
        assert_eq!(kept.len(), 10);
        assert_eq!(kept[0].id, "coin-0");
        assert_eq!(kept[9].id, "coin-9");
    }

    #[test]
    fn zero_limit_rejected_without_request() {
        let client = CoinGeckoClient::new(&ApiConfig::default()).expect("client should build");

        let err = tokio_test::block_on(client.fetch_top_markets(0)).unwrap_err();
        assert!(matches!(err, TrackError::InvalidInput(_)));
    }

    #[test]
    fn blank_inputs_rejected_without_request() {
        let client = CoinGeckoClient::new(&ApiConfig::default()).expect("client should build");

        let err = tokio_test::block_on(client.fetch_quote("   ")).unwrap_err();
        assert!(matches!(err, TrackError::InvalidInput(_)));

        let err = tokio_test::block_on(client.search("")).unwrap_err();
        assert!(matches!(err, TrackError::InvalidInput(_)));
    }

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let cfg = ApiConfig {
            base_url: "https://api.coingecko.com/api/v3/".to_string(),
            ..ApiConfig::default()
        };

        // Request paths start with '/'; a kept trailing slash would double it.
        let client = CoinGeckoClient::new(&cfg).expect("client should build");
        assert_eq!(client.base_url(), "https://api.coingecko.com/api/v3");
        assert_eq!(client.vs_currency(), "usd");
    }

    #[test]
    fn market_rows_decode_with_nullable_fields() {
        let raw = serde_json::json!([
            {
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "current_price": 43521.5,
                "market_cap": 850_000_000_000.0_f64,
                "price_change_percentage_24h": 2.34,
                "total_volume": 23_000_000_000.0_f64
            },
            {
                "id": "mystery",
                "symbol": "myst",
                "name": "Mystery",
                "current_price": null,
                "market_cap": null,
                "price_change_percentage_24h": null,
                "total_volume": null
            }
        ]);

        let rows: Vec<MarketEntry> = serde_json::from_value(raw).expect("rows should decode");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].change_24h, Some(2.34));
        assert_eq!(rows[1].current_price, None);
    }
}
