use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Current state of a single asset from the simple-price endpoint.
///
/// Values are carried at the API's native JSON number precision; rounding
/// happens only at the display step. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuote {
    pub id: String,
    pub price: f64,
    /// 24h percent change; 0 when the API omits it
    pub change_24h: f64,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// One row of the ranked market listing (/coins/markets)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(rename = "price_change_percentage_24h", default)]
    pub change_24h: Option<f64>,
    #[serde(rename = "total_volume", default)]
    pub volume_24h: Option<f64>,
}

/// One search match (/search), in the API's relevance order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}
