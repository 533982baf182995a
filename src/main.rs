use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use currency_rates::{
    CurrencyCode, FileStore, HttpRateSource, RateResolver, RateSnapshot, Settings, SystemClock,
};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Currency conversion with a cached rate table", long_about = None)]
struct Cli {
    /// Cache file location (overrides CACHE_FILE)
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert an amount between two currencies
    Convert {
        from: CurrencyCode,
        to: CurrencyCode,
        amount: f64,
    },
    /// Print the conversion factor between two currencies
    Rate { from: CurrencyCode, to: CurrencyCode },
    /// List every rate in the current table
    List,
    /// Fetch a new rate table regardless of the cache
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(path) = cli.cache_file {
        settings.cache_file = path;
    }

    let resolver = RateResolver::new(
        Arc::new(SystemClock),
        Arc::new(HttpRateSource::new(&settings)?),
        Arc::new(FileStore::new(settings.cache_file.clone())),
    );

    match cli.command {
        Commands::Convert { from, to, amount } => {
            let converted = resolver.convert(amount, &from, &to).await?;
            println!("{} {} is {} {}", amount, from, converted, to);
        }
        Commands::Rate { from, to } => {
            let factor = resolver.resolve(&from, &to).await?;
            println!("1 {} = {} {}", from, factor, to);
        }
        Commands::List => {
            let snapshot = resolver.snapshot().await?;
            print_snapshot(resolver.base(), &snapshot);
        }
        Commands::Refresh => {
            let snapshot = resolver.refresh().await?;
            println!(
                "Stored {} rates for {} at {}",
                snapshot.rates.len(),
                resolver.base(),
                captured_at(&snapshot)
            );
        }
    }

    Ok(())
}

fn captured_at(snapshot: &RateSnapshot) -> String {
    Utc.timestamp_millis_opt(snapshot.captured_at)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| snapshot.captured_at.to_string())
}

fn print_snapshot(base: &str, snapshot: &RateSnapshot) {
    println!("Exchange rates for {} (captured {}):", base, captured_at(snapshot));
    for (currency, rate) in snapshot.sorted_rates() {
        println!("{}: {}", currency, rate);
    }
}
