// src/bin/preview_briefing.rs
// Renders a briefing from a report artifact with both feeds offline, so the
// merge output can be inspected without network access or live credentials.
use chrono::Utc;
use dotenv::dotenv;
use log::info;
use std::path::PathBuf;

use ops_dashboard_nccat::config::AppConfig;
use ops_dashboard_nccat::services::{merge, report};

fn main() -> std::result::Result<(), ops_dashboard_nccat::BoxError> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.report_path.clone());
    info!("Previewing briefing from {}", path.display());

    let daily_report = report::load_report(&path)?;
    let now = Utc::now().with_timezone(&config.site_tz);
    let unified = merge::build_unified_state(&config, &daily_report, None, None, now);

    println!("{}", serde_json::to_string_pretty(&unified)?);
    Ok(())
}
