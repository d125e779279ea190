//! `cryptotrack --interactive` - interactive REPL over the command handlers.

use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::adapters::QuoteSource;
use crate::config::AppConfig;
use crate::error::Result;

/// Internal CLI struct for shell-line parsing.
#[derive(Parser, Debug)]
#[command(name = "crypto", no_binary_name = true)]
struct ShellCli {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Show the top cryptocurrencies by market cap
    Top {
        #[arg(default_value_t = 10)]
        count: u32,
    },
    /// Show the current price of one coin id
    Price { id: String },
    /// Search coins by name or symbol
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Watch one coin with live updates
    Watch { id: String, interval: Option<u64> },
}

pub async fn run_shell(source: &dyn QuoteSource, cfg: &AppConfig, symbol: &str) -> Result<()> {
    println!("🚀 CryptoTrack - Interactive Mode");
    println!("Commands: top [number], search [query], watch [crypto], price [crypto], quit");

    let history_path = AppConfig::config_dir().map(|d| d.join("history.txt"));

    let mut rl = DefaultEditor::new()?;
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        println!();
        match rl.readline("\x1b[36mcrypto>\x1b[0m ") {
            Ok(line) => {
                // Whole-line lowercasing keeps commands and coin ids
                // case-insensitive; upstream ids are lowercase anyway.
                let line = line.trim().to_lowercase();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match line.as_str() {
                    "quit" | "exit" | "q" => break,
                    "help" | "?" => {
                        print_shell_help();
                        continue;
                    }
                    _ => {}
                }

                match ShellCli::try_parse_from(line.split_whitespace()) {
                    Ok(parsed) => dispatch(parsed.command, source, cfg, symbol).await,
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }

    Ok(())
}

async fn dispatch(command: ShellCommand, source: &dyn QuoteSource, cfg: &AppConfig, symbol: &str) {
    let mut stdout = std::io::stdout();
    let outcome = match command {
        ShellCommand::Top { count } => super::show_top(source, &mut stdout, count, symbol).await,
        ShellCommand::Price { id } => super::show_price(source, &mut stdout, &id, symbol).await,
        ShellCommand::Search { terms } => {
            let query = terms.join(" ");
            super::show_search(source, &mut stdout, &query).await
        }
        ShellCommand::Watch { id, interval } => {
            let secs = interval.unwrap_or(cfg.watch.interval_secs);
            super::watch_asset(source, &mut stdout, &id, secs, symbol).await
        }
    };
    // Handlers absorb lookup and network failures themselves; anything left
    // is a terminal write failure.
    if let Err(e) = outcome {
        eprintln!("\x1b[31m{e}\x1b[0m");
    }
}

fn print_shell_help() {
    println!("Available commands:");
    println!("  top [number]               (top coins by market cap, default 10)");
    println!("  price <crypto>             (current price of one coin id)");
    println!("  search <query>             (search coins by name or symbol)");
    println!("  watch <crypto> [interval]  (live updates, Ctrl+C stops)");
    println!("  help                       (this message)");
    println!("  quit                       (leave the shell)");
}
