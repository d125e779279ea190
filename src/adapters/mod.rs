pub mod coingecko;

pub use coingecko::{CoinGeckoClient, SEARCH_RESULT_LIMIT};

use async_trait::async_trait;

use crate::domain::{AssetQuote, MarketEntry, SearchResult};
use crate::error::Result;

/// Read-only access to the price API.
///
/// `CoinGeckoClient` is the production implementation; the trait is the seam
/// that lets the dispatcher and the refresh loop run against test doubles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Current quote for one asset id
    async fn fetch_quote(&self, asset_id: &str) -> Result<AssetQuote>;

    /// Top markets by descending market cap, first page only
    async fn fetch_top_markets(&self, limit: u32) -> Result<Vec<MarketEntry>>;

    /// Name/symbol search, capped at the first 10 matches
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}
