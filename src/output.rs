//! Terminal output for cryptotrack commands.
//!
//! Formatting is pure (value in, string out) and separated from the print
//! functions, which write into any `std::io::Write` so tests can capture
//! them. Color is applied around already-padded cells; escape bytes never
//! count toward column widths.

use std::io::Write;

use chrono::Local;

use crate::domain::{AssetQuote, MarketEntry, SearchResult};
use crate::error::Result;

/// Visual classification of a percent change. The renderer decides how to
/// realize it; the plain text stays available for non-color consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStyle {
    Positive,
    Negative,
    Neutral,
}

/// A formatted percent change plus its style attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedChange {
    pub text: String,
    pub style: ChangeStyle,
}

impl FormattedChange {
    /// ANSI-colored rendering: green positive, red negative, plain zero.
    pub fn painted(&self) -> String {
        match self.style {
            ChangeStyle::Positive => format!("\x1b[32m{}\x1b[0m", self.text),
            ChangeStyle::Negative => format!("\x1b[31m{}\x1b[0m", self.text),
            ChangeStyle::Neutral => self.text.clone(),
        }
    }
}

/// Format a price in one of three precision tiers, selected on the raw
/// magnitude before any rounding.
pub fn format_price(value: f64, symbol: &str) -> String {
    if value >= 1000.0 {
        let text = format!("{value:.2}");
        match text.split_once('.') {
            Some((int_part, frac)) => format!("{symbol}{}.{frac}", group_thousands(int_part)),
            None => format!("{symbol}{}", group_thousands(&text)),
        }
    } else if value >= 1.0 {
        format!("{symbol}{value:.4}")
    } else {
        format!("{symbol}{value:.8}")
    }
}

/// Format a 24h percent change. Positive values get an explicit `+`;
/// exact zero renders unsigned.
pub fn format_change(pct: f64) -> FormattedChange {
    if pct > 0.0 {
        FormattedChange {
            text: format!("+{pct:.2}%"),
            style: ChangeStyle::Positive,
        }
    } else if pct < 0.0 {
        FormattedChange {
            text: format!("{pct:.2}%"),
            style: ChangeStyle::Negative,
        }
    } else {
        FormattedChange {
            text: format!("{pct:.2}%"),
            style: ChangeStyle::Neutral,
        }
    }
}

/// Whole-number amount with thousands separators, for market caps and
/// volumes.
pub fn format_amount(value: f64, symbol: &str) -> String {
    format!("{symbol}{}", group_thousands(&format!("{value:.0}")))
}

/// Truncate a display name to 18 characters plus a 2-character ellipsis.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > 18 {
        let cut: String = name.chars().take(18).collect();
        format!("{cut}..")
    } else {
        name.to_string()
    }
}

/// Symbol for a quote-currency code; unknown codes fall back to the
/// uppercased code.
pub fn currency_symbol(code: &str) -> String {
    match code.to_ascii_lowercase().as_str() {
        "usd" => "$".to_string(),
        "eur" => "€".to_string(),
        "gbp" => "£".to_string(),
        "jpy" => "¥".to_string(),
        other => format!("{} ", other.to_uppercase()),
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::from(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// Pad to the column width first, then color, so the escape bytes sit
// outside the counted cell.
fn paint_cell(change: &FormattedChange, width: usize) -> String {
    let padded = format!("{:<w$}", change.text, w = width);
    match change.style {
        ChangeStyle::Positive => format!("\x1b[32m{padded}\x1b[0m"),
        ChangeStyle::Negative => format!("\x1b[31m{padded}\x1b[0m"),
        ChangeStyle::Neutral => padded,
    }
}

/// Multi-line single-asset view.
pub fn print_quote(w: &mut dyn Write, quote: &AssetQuote, symbol: &str) -> Result<()> {
    writeln!(w, "\n{}", quote.id.to_uppercase())?;
    writeln!(w, "Price: {}", format_price(quote.price, symbol))?;
    writeln!(w, "24h Change: {}", format_change(quote.change_24h).painted())?;
    match quote.market_cap {
        Some(cap) if cap > 0.0 => writeln!(w, "Market Cap: {}", format_amount(cap, symbol))?,
        _ => writeln!(w, "Market Cap: N/A")?,
    }
    match quote.volume_24h {
        Some(vol) if vol > 0.0 => writeln!(w, "Volume (24h): {}", format_amount(vol, symbol))?,
        _ => writeln!(w, "Volume (24h): N/A")?,
    }
    if let Some(ts) = quote.last_updated {
        writeln!(w, "Last Updated: {}", ts.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    Ok(())
}

/// Fixed-width market table: header, 75-dash rule, one row per entry in
/// input order. Emits nothing at all for an empty slice; the caller decides
/// whether to show an empty-result message.
pub fn print_market_table(w: &mut dyn Write, entries: &[MarketEntry], symbol: &str) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(
        w,
        "\n{:<8} {:<20} {:<15} {:<12} {:<15}",
        "Symbol", "Name", "Price", "24h Change", "Market Cap"
    )?;
    writeln!(w, "{}", "-".repeat(75))?;

    for entry in entries {
        let price = format_price(entry.current_price.unwrap_or(0.0), symbol);
        let change = format_change(entry.change_24h.unwrap_or(0.0));
        let cap = match entry.market_cap {
            Some(cap) if cap > 0.0 => format_amount(cap, symbol),
            _ => "N/A".to_string(),
        };

        writeln!(
            w,
            "{:<8} {:<20} {:<15} {} {:<15}",
            entry.symbol.to_uppercase(),
            truncate_name(&entry.name),
            price,
            paint_cell(&change, 12),
            cap
        )?;
    }

    Ok(())
}

/// Numbered search matches under a query header.
pub fn print_search_results(w: &mut dyn Write, query: &str, results: &[SearchResult]) -> Result<()> {
    writeln!(w, "\nSearch results for '{query}':")?;
    for (i, coin) in results.iter().enumerate() {
        writeln!(
            w,
            "{}. {} ({}) - ID: {}",
            i + 1,
            coin.name,
            coin.symbol.to_uppercase(),
            coin.id
        )?;
    }
    Ok(())
}

/// One overwritten watch line: carriage return, no newline, explicit flush.
pub fn print_watch_line(
    w: &mut dyn Write,
    asset_id: &str,
    quote: &AssetQuote,
    symbol: &str,
) -> Result<()> {
    write!(
        w,
        "\r[{}] {}: {} ({})",
        Local::now().format("%H:%M:%S"),
        asset_id.to_uppercase(),
        format_price(quote.price, symbol),
        format_change(quote.change_24h).painted()
    )?;
    w.flush()?;
    Ok(())
}

/// The single termination notice for a watch session.
pub fn print_watch_stopped(w: &mut dyn Write) -> Result<()> {
    writeln!(w, "\n\nStopped watching.")?;
    Ok(())
}
