mod config;
mod dates;
mod error;
mod models;
mod scrapers;

use config::ScoutConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏨 Hotel Scout - MakeMyTrip price sampler");
    info!("=========================================");

    // Optional JSON config as the only argument; defaults otherwise
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ScoutConfig::from_file(&path)?
        }
        None => ScoutConfig {
            search: scrapers::types::SearchParams {
                checkin: Some("March 27, 2025".to_string()),
                checkout: Some("March 28, 2025".to_string()),
                star_rating: Some(3),
                ..Default::default()
            },
            ..Default::default()
        },
    };

    match scrapers::scrape_hotel_prices(&config.search, &config).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("❌ Something went wrong: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
