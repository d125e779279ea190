pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod watch;

pub use adapters::{CoinGeckoClient, QuoteSource, SEARCH_RESULT_LIMIT};
pub use config::AppConfig;
pub use domain::{AssetQuote, MarketEntry, SearchResult};
pub use error::{Result, TrackError};
pub use output::{ChangeStyle, FormattedChange};
pub use watch::{Sleeper, StopSignal, TokioSleeper, WatchSession, WatchState};
