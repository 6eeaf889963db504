// src/bin/test_feeds.rs
// Hits both live feed endpoints with the configured credentials.
use dotenv::dotenv;
use ops_dashboard_nccat::config::AppConfig;
use ops_dashboard_nccat::services::{ambient, usgs};

#[tokio::main]
async fn main() -> std::result::Result<(), ops_dashboard_nccat::BoxError> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;

    println!("Ambient devices: {:#?}", ambient::fetch_devices(&config).await?);
    println!("USGS gauge:      {:?}", usgs::fetch_gauge_level(&config).await?);
    Ok(())
}
