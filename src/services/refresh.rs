// src/services/refresh.rs
use chrono::{Duration, Utc};
use log::{error, info, warn};
use std::sync::Arc;

use super::{ambient, merge, report, usgs};
use crate::state::{AppState, Briefing};

pub const STATION_CACHE_KEY: &str = "ambient_devices";
pub const GAUGE_CACHE_KEY: &str = "usgs_gauge";

/// Run one full fetch -> cache -> merge cycle and publish the result.
///
/// Both feed fetches run concurrently, each bounded by its own client
/// timeout; the merge waits on the join of the two. Only a report-artifact
/// failure blocks the cycle.
pub async fn run_cycle(state: &Arc<AppState>) -> Briefing {
    let config = &state.config;
    let ttl = Duration::seconds(config.feed_ttl_secs as i64);

    let (station_result, gauge_result) = tokio::join!(
        state
            .station_cache
            .get_or_fetch(STATION_CACHE_KEY, ttl, || ambient::fetch_devices(config)),
        state
            .gauge_cache
            .get_or_fetch(GAUGE_CACHE_KEY, ttl, || usgs::fetch_gauge_level(config)),
    );

    let devices = match station_result {
        Ok(devices) => devices,
        Err(e) => {
            warn!("Weather station feed offline this cycle: {}", e);
            Vec::new()
        }
    };

    let gauge = match gauge_result {
        Ok(reading) => Some(reading),
        Err(e) => {
            warn!("River gauge feed offline this cycle: {}", e);
            None
        }
    };

    let briefing = match report::load_report(&config.report_path) {
        Ok(daily_report) => {
            let now = Utc::now().with_timezone(&config.site_tz);
            let unified = merge::build_unified_state(
                config,
                &daily_report,
                devices.first(),
                gauge.as_ref(),
                now,
            );
            info!(
                "Render cycle complete, directive: {}",
                unified.directive.status
            );
            Briefing::Ready(unified)
        }
        Err(e) => {
            error!("Render cycle blocked: {}", e);
            Briefing::Failed(e.to_string())
        }
    };

    state.publish(briefing.clone());
    briefing
}
