// src/handlers/refresh.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::refresh;
use crate::state::{AppState, Briefing};

/// Manual refresh: run a full cycle now instead of waiting for the next
/// scheduler tick, then return the fresh briefing.
pub async fn post_refresh(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Manual refresh requested");

    match refresh::run_cycle(&state).await {
        Briefing::Ready(unified) => Ok(warp::reply::json(&unified)),
        Briefing::Failed(message) => {
            error!("Manual refresh blocked by report failure: {}", message);
            Err(warp::reject::custom(ApiError::report_error(message)))
        }
        Briefing::Pending => Err(warp::reject::custom(ApiError::not_ready(
            "refresh cycle did not publish a briefing",
        ))),
    }
}
