// src/handlers/gauge.rs
use chrono::Duration;
use log::{info, warn};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::refresh::GAUGE_CACHE_KEY;
use crate::services::{merge, usgs};
use crate::state::AppState;

/// River gauge panel, read through the feed cache. A failed fetch degrades
/// to the placeholder panel.
pub async fn get_gauge(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for the river gauge reading");

    let ttl = Duration::seconds(state.config.feed_ttl_secs as i64);
    let result = state
        .gauge_cache
        .get_or_fetch(GAUGE_CACHE_KEY, ttl, || {
            usgs::fetch_gauge_level(&state.config)
        })
        .await;

    let panel = match result {
        Ok(reading) => merge::gauge_panel(Some(&reading), &state.config.usgs_site_id),
        Err(e) => {
            warn!("Gauge feed unavailable: {}", e);
            merge::gauge_panel(None, &state.config.usgs_site_id)
        }
    };

    Ok(warp::reply::json(&panel))
}
