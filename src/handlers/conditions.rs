// src/handlers/conditions.rs
use chrono::Duration;
use log::{info, warn};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::refresh::STATION_CACHE_KEY;
use crate::services::{ambient, merge};
use crate::state::AppState;

/// Live station panel, read through the feed cache. A failed fetch renders
/// the panel offline rather than erroring the endpoint.
pub async fn get_conditions(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for live station conditions");

    let ttl = Duration::seconds(state.config.feed_ttl_secs as i64);
    let result = state
        .station_cache
        .get_or_fetch(STATION_CACHE_KEY, ttl, || {
            ambient::fetch_devices(&state.config)
        })
        .await;

    let panel = match result {
        Ok(devices) => merge::station_panel(devices.first()),
        Err(e) => {
            warn!("Station feed unavailable: {}", e);
            merge::station_panel(None)
        }
    };

    Ok(warp::reply::json(&panel))
}
