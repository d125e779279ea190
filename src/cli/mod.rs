//! CryptoTrack CLI - flag dispatch and command handlers
//!
//! Modes:
//! - `cryptotrack --top N` - ranked market table
//! - `cryptotrack --price ID` - single-asset quote view
//! - `cryptotrack --search QUERY` - name/symbol lookup
//! - `cryptotrack --watch ID` - live refresh loop
//! - `cryptotrack --interactive` - REPL wrapping the other modes

pub mod shell;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;

use crate::adapters::QuoteSource;
use crate::config::AppConfig;
use crate::error::{Result, TrackError};
use crate::output;
use crate::watch::{StopSignal, TokioSleeper, WatchSession};

/// CryptoTrack - Live Cryptocurrency Rates CLI
#[derive(Parser, Debug)]
#[command(name = "cryptotrack")]
#[command(author, version, about = "CryptoTrack - Live Cryptocurrency Rates CLI")]
pub struct Cli {
    /// Show top N cryptocurrencies by market cap
    #[arg(short, long, value_name = "N", group = "mode")]
    pub top: Option<u32>,

    /// Get price of specific cryptocurrency (use coin ID)
    #[arg(short, long, value_name = "ID", group = "mode")]
    pub price: Option<String>,

    /// Search for cryptocurrencies
    #[arg(short, long, value_name = "QUERY", group = "mode")]
    pub search: Option<String>,

    /// Watch specific cryptocurrency for live updates
    #[arg(short, long, value_name = "ID", group = "mode")]
    pub watch: Option<String>,

    /// Update interval in seconds for watch mode (default: 30)
    #[arg(short, long, value_name = "SECONDS", requires = "watch")]
    pub interval: Option<u64>,

    /// Run in interactive mode
    #[arg(long, group = "mode")]
    pub interactive: bool,
}

impl Cli {
    /// Dispatch the parsed flags onto the command handlers. With no mode
    /// flag at all, show the top-10 table followed by a usage hint.
    pub async fn run(self, source: &dyn QuoteSource, cfg: &AppConfig) -> Result<()> {
        let symbol = output::currency_symbol(&cfg.api.vs_currency);
        let mut stdout = std::io::stdout();

        if self.interactive {
            return shell::run_shell(source, cfg, &symbol).await;
        }
        if let Some(limit) = self.top {
            return show_top(source, &mut stdout, limit, &symbol).await;
        }
        if let Some(id) = self.price {
            return show_price(source, &mut stdout, &id, &symbol).await;
        }
        if let Some(query) = self.search {
            return show_search(source, &mut stdout, &query).await;
        }
        if let Some(id) = self.watch {
            let interval = self.interval.unwrap_or(cfg.watch.interval_secs);
            return watch_asset(source, &mut stdout, &id, interval, &symbol).await;
        }

        show_top(source, &mut stdout, 10, &symbol).await?;
        print_usage_hint(&mut stdout)?;
        Ok(())
    }
}

/// Fetch and render the ranked market table
pub async fn show_top(
    source: &dyn QuoteSource,
    w: &mut dyn Write,
    limit: u32,
    symbol: &str,
) -> Result<()> {
    match source.fetch_top_markets(limit).await {
        Ok(entries) if entries.is_empty() => writeln!(w, "(no results)")?,
        Ok(entries) => output::print_market_table(w, &entries, symbol)?,
        Err(e) => print_command_error(w, &e)?,
    }
    Ok(())
}

/// Fetch and render the quote view for one asset
pub async fn show_price(
    source: &dyn QuoteSource,
    w: &mut dyn Write,
    asset_id: &str,
    symbol: &str,
) -> Result<()> {
    match source.fetch_quote(asset_id).await {
        Ok(quote) => output::print_quote(w, &quote, symbol)?,
        Err(TrackError::NotFound(_)) => writeln!(w, "Cryptocurrency not found.")?,
        Err(e) => print_command_error(w, &e)?,
    }
    Ok(())
}

/// Search by name or symbol and render the numbered matches
pub async fn show_search(source: &dyn QuoteSource, w: &mut dyn Write, query: &str) -> Result<()> {
    match source.search(query).await {
        Ok(results) if results.is_empty() => writeln!(w, "No results found.")?,
        Ok(results) => output::print_search_results(w, query, &results)?,
        Err(e) => print_command_error(w, &e)?,
    }
    Ok(())
}

/// Run the live refresh loop for one asset until Ctrl+C
pub async fn watch_asset(
    source: &dyn QuoteSource,
    w: &mut dyn Write,
    asset_id: &str,
    interval_secs: u64,
    symbol: &str,
) -> Result<()> {
    let session = WatchSession::new(asset_id, interval_secs);
    writeln!(
        w,
        "Watching {} - Press Ctrl+C to stop",
        session.asset_id().to_uppercase()
    )?;
    writeln!(w, "Update interval: {} seconds", session.interval().as_secs())?;

    let stop = Arc::new(StopSignal::new());
    let ctrl_c_stop = Arc::clone(&stop);
    let forwarder = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_stop.stop();
        }
    });

    let outcome = session.run(source, &TokioSleeper, &stop, w, symbol).await;
    forwarder.abort();
    outcome
}

// Handled failures are reported on the command's own output stream and do
// not change the exit code.
fn print_command_error(w: &mut dyn Write, err: &TrackError) -> std::io::Result<()> {
    writeln!(w, "\x1b[31mError:\x1b[0m {err}")
}

fn print_usage_hint(w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "\nUsage examples:")?;
    writeln!(w, "  cryptotrack --top 20")?;
    writeln!(w, "  cryptotrack --price bitcoin")?;
    writeln!(w, "  cryptotrack --search ethereum")?;
    writeln!(w, "  cryptotrack --watch bitcoin")?;
    writeln!(w, "  cryptotrack --interactive")
}
