//! Gorbagios Scraper - Magic Eden collection dump
//!
//! Resolves the collection symbol, then pulls stats, listings, activity
//! history and per-NFT metadata, and writes everything (plus a holder
//! distribution) to `gorbagios_data/`.

use gorbagios_scraper::utils::constants::{APP_NAME, APP_VERSION};
use gorbagios_scraper::{Scraper, ScraperConfig};

use eyre::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG overrides the INFO default)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    println!(
        r#"
    ╔══════════════════════════════════════════════════════╗
    ║                                                      ║
    ║        G O R B A G I O S   S C R A P E R             ║
    ║        Magic Eden collection data dump               ║
    ║                                                      ║
    ╚══════════════════════════════════════════════════════╝
    "#
    );
    println!("    {} v{}\n", APP_NAME, APP_VERSION);

    let scraper = Scraper::from_config(ScraperConfig::default())?;
    let report = match scraper.run().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", report.summary());
    Ok(())
}
