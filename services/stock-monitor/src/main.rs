//! Stock Monitor CLI
//!
//! Configuration comes from the environment; the command line only controls
//! logging and run mode.

use clap::Parser;
use stock_monitor::{Config, StockMonitorBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "stock-monitor")]
#[command(about = "Retail product page stock monitor with Gotify notifications")]
#[command(version)]
struct Args {
    /// Exit as soon as any product is in stock (overrides EXIT_ON_STOCK)
    #[arg(long)]
    exit_on_stock: bool,

    /// Run a single check cycle and exit
    #[arg(long)]
    once: bool,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = parse_log_level)]
    log_level: Level,
}

fn parse_log_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid log level: {}. Use: trace, debug, info, warn, error",
            s
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: exit_on_stock={}, once={}, log_level={:?}",
        args.exit_on_stock,
        args.once,
        args.log_level
    );

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };
    if args.exit_on_stock {
        config.exit_on_stock = true;
    }

    StockMonitorBuilder::new(config)
        .build()
        .start(args.once)
        .await?;

    Ok(())
}
