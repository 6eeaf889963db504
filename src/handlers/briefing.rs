// src/handlers/briefing.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::state::{AppState, Briefing};

/// Serve the latest published briefing. A report-load failure is the one
/// error shown as a blocking message; feed failures are already folded
/// into placeholder values by the merge.
pub async fn get_briefing(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for the current briefing");

    match state.latest() {
        Briefing::Ready(unified) => Ok(warp::reply::json(&unified)),
        Briefing::Failed(message) => {
            error!("Briefing blocked by report failure: {}", message);
            Err(warp::reject::custom(ApiError::report_error(message)))
        }
        Briefing::Pending => Err(warp::reject::custom(ApiError::not_ready(
            "no render cycle has completed yet",
        ))),
    }
}
