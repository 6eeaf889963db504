// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;

use crate::handlers::{
    briefing::get_briefing, conditions::get_conditions, gauge::get_gauge, refresh::post_refresh,
};
use crate::state::AppState;
use log::info;

use crate::handlers::error::{ApiError, ApiErrorKind};
use std::convert::Infallible;
use warp::{Filter, Reply};

// Add recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = match api_error.kind {
            ApiErrorKind::NotReady => warp::http::StatusCode::SERVICE_UNAVAILABLE,
            _ => warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        message = api_error.message.clone();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let briefing_route = warp::path!("api" / "v1" / "briefing")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_briefing);

    let conditions_route = warp::path!("api" / "v1" / "conditions")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_conditions);

    let gauge_route = warp::path!("api" / "v1" / "gauge")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_gauge);

    let refresh_route = warp::path!("api" / "v1" / "refresh")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(post_refresh);

    info!("All routes configured successfully.");

    briefing_route
        .or(conditions_route)
        .or(gauge_route)
        .or(refresh_route)
        .recover(handle_rejection)
}
