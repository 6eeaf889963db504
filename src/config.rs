// src/config.rs
use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;

use crate::models::WeeklyTemplate;

/// USGS 03439000, Tuckasegee River at Cullowhee NC.
const DEFAULT_USGS_SITE_ID: &str = "03439000";
/// USGS parameter 00045, precipitation in inches.
const DEFAULT_USGS_PARAMETER_CD: &str = "00045";

const DEFAULT_REPORT_PATH: &str = "latest_report.json";
const DEFAULT_FEED_TTL_SECS: u64 = 300;
const DEFAULT_REFRESH_SECS: u64 = 300;
const DEFAULT_SITE_TZ: &str = "America/New_York";

/// Everything the feed clients and the merge engine need, assembled once at
/// startup. Credentials come only from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ambient_api_key: String,
    pub ambient_app_key: String,
    pub usgs_site_id: String,
    pub usgs_parameter_cd: String,
    pub report_path: PathBuf,
    pub feed_ttl_secs: u64,
    pub refresh_secs: u64,
    pub site_tz: Tz,
    pub template: WeeklyTemplate,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let ambient_api_key =
            env::var("AMBIENT_API_KEY").context("AMBIENT_API_KEY must be set")?;
        let ambient_app_key =
            env::var("AMBIENT_APP_KEY").context("AMBIENT_APP_KEY must be set")?;

        let usgs_site_id =
            env::var("USGS_SITE_ID").unwrap_or_else(|_| DEFAULT_USGS_SITE_ID.to_string());
        let usgs_parameter_cd = env::var("USGS_PARAMETER_CD")
            .unwrap_or_else(|_| DEFAULT_USGS_PARAMETER_CD.to_string());

        let report_path = PathBuf::from(
            env::var("REPORT_PATH").unwrap_or_else(|_| DEFAULT_REPORT_PATH.to_string()),
        );

        let feed_ttl_secs = read_secs("FEED_TTL_SECONDS", DEFAULT_FEED_TTL_SECS)?;
        let refresh_secs = read_secs("REFRESH_SECONDS", DEFAULT_REFRESH_SECS)?;

        let site_tz = env::var("SITE_TZ")
            .unwrap_or_else(|_| DEFAULT_SITE_TZ.to_string())
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid SITE_TZ: {}", e))?;

        Ok(Self {
            ambient_api_key,
            ambient_app_key,
            usgs_site_id,
            usgs_parameter_cd,
            report_path,
            feed_ttl_secs,
            refresh_secs,
            site_tz,
            template: WeeklyTemplate::cullowhee(),
        })
    }
}

fn read_secs(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number of seconds", name)),
        Err(_) => Ok(default),
    }
}
