use async_trait::async_trait;

use cryptotrack::cli::{show_price, show_top};
use cryptotrack::{AssetQuote, MarketEntry, QuoteSource, Result, SearchResult, TrackError};

fn entry(symbol: &str, name: &str, price: f64, cap: f64, change: f64) -> MarketEntry {
    MarketEntry {
        id: name.to_lowercase().replace(' ', "-"),
        symbol: symbol.to_string(),
        name: name.to_string(),
        current_price: Some(price),
        market_cap: Some(cap),
        change_24h: Some(change),
        volume_24h: None,
    }
}

/// Source with canned answers for every operation.
struct FixedSource {
    entries: Vec<MarketEntry>,
    quote: Option<AssetQuote>,
}

#[async_trait]
impl QuoteSource for FixedSource {
    async fn fetch_quote(&self, asset_id: &str) -> Result<AssetQuote> {
        self.quote
            .clone()
            .ok_or_else(|| TrackError::NotFound(asset_id.to_string()))
    }

    async fn fetch_top_markets(&self, limit: u32) -> Result<Vec<MarketEntry>> {
        Ok(self.entries.iter().take(limit as usize).cloned().collect())
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn top_table_renders_requested_rows_in_source_order() {
    let source = FixedSource {
        entries: vec![
            entry("btc", "Bitcoin", 43_521.5, 850_000_000_000.0, 2.34),
            entry("eth", "Ethereum", 2_245.12, 270_000_000_000.0, -1.05),
            entry("usdt", "Tether", 0.999, 91_000_000_000.0, 0.0),
            entry("bnb", "BNB", 312.4, 48_000_000_000.0, 0.8),
            entry("sol", "Solana", 98.77, 42_000_000_000.0, 5.6),
        ],
        quote: None,
    };

    let mut out = Vec::new();
    show_top(&source, &mut out, 3, "$").await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    // Leading blank line, header, rule, then exactly one row per entry.
    assert_eq!(lines.len(), 6, "unexpected table shape:\n{text}");
    assert!(lines[1].starts_with("Symbol   Name"));
    assert_eq!(lines[2], "-".repeat(75));
    assert!(lines[3].starts_with("BTC "));
    assert!(lines[4].starts_with("ETH "));
    assert!(lines[5].starts_with("USDT "));
    assert!(lines[3].contains("$43,521.50"));
}

#[tokio::test]
async fn price_view_renders_the_full_quote_block() {
    let source = FixedSource {
        entries: Vec::new(),
        quote: Some(AssetQuote {
            id: "bitcoin".to_string(),
            price: 43_521.5,
            change_24h: 2.34,
            market_cap: Some(850_000_000_000.0),
            volume_24h: Some(25_000_000_000.0),
            last_updated: None,
        }),
    };

    let mut out = Vec::new();
    show_price(&source, &mut out, "bitcoin", "$").await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "\nBITCOIN\n\
         Price: $43,521.50\n\
         24h Change: \x1b[32m+2.34%\x1b[0m\n\
         Market Cap: $850,000,000,000\n\
         Volume (24h): $25,000,000,000\n"
    );
}

#[tokio::test]
async fn unknown_asset_prints_the_not_found_line_only() {
    let source = FixedSource {
        entries: Vec::new(),
        quote: None,
    };

    let mut out = Vec::new();
    show_price(&source, &mut out, "not-a-coin", "$").await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Cryptocurrency not found.\n");
}
