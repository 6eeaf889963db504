use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use warp::Filter;

use ops_dashboard_nccat::config::AppConfig;
use ops_dashboard_nccat::routes;
use ops_dashboard_nccat::services::refresh;
use ops_dashboard_nccat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the briefing service...");

    let config = AppConfig::from_env()?;
    let refresh_secs = config.refresh_secs;
    let state = AppState::new(config);

    // First cycle up front so the API has a briefing to serve immediately.
    refresh::run_cycle(&state).await;

    // Recurring fetch -> cache -> merge cycle, decoupled from UI redraws.
    let sched = JobScheduler::new().await?;
    let job_state = state.clone();
    sched
        .add(Job::new_repeated_async(
            Duration::from_secs(refresh_secs),
            move |_id, _lock| {
                let state = job_state.clone();
                Box::pin(async move {
                    refresh::run_cycle(&state).await;
                })
            },
        )?)
        .await?;
    sched.start().await?;
    info!("Refresh scheduler started ({}s interval)", refresh_secs);

    // Get port from the environment, default to 3030
    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });
    let port: u16 = port_str.parse().context("PORT must be a number")?;
    info!("Using PORT: {}", port);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    // Set up CORS for the dashboard frontend
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;

    Ok(())
}
