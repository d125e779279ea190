use clap::Parser;
use cryptotrack::adapters::CoinGeckoClient;
use cryptotrack::cli::Cli;
use cryptotrack::config::AppConfig;
use cryptotrack::error::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let cfg = AppConfig::load()?;
    let client = CoinGeckoClient::new(&cfg.api)?;

    cli.run(&client, &cfg).await
}

// Logs go to stderr so they cannot disturb command output or the
// carriage-return watch line on stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
