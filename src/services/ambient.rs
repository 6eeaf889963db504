// src/services/ambient.rs
use log::{info, warn};
use serde::Deserialize;
use std::time::Duration;

use super::FetchError;
use crate::config::AppConfig;

const DEVICES_URL: &str = "https://api.ambientweather.net/v1/devices";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One weather station registered to the account.
#[derive(Debug, Clone, Deserialize)]
pub struct AmbientDevice {
    #[serde(rename = "macAddress", default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub info: Option<DeviceInfo>,
    #[serde(rename = "lastData", default)]
    pub last_data: StationReading,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// Latest sample from a station's sensor suite. Any subset of sensors may
/// be absent from a given response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationReading {
    #[serde(default)]
    pub tempf: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(rename = "windspeedmph", default)]
    pub wind_speed_mph: Option<f64>,
    #[serde(rename = "windgustmph", default)]
    pub wind_gust_mph: Option<f64>,
    #[serde(rename = "winddir", default)]
    pub wind_dir: Option<f64>,
    #[serde(rename = "dailyrainin", default)]
    pub daily_rain_in: Option<f64>,
    #[serde(rename = "baromrelin", default)]
    pub pressure_inhg: Option<f64>,
    #[serde(rename = "uv", default)]
    pub uv_index: Option<f64>,
    #[serde(rename = "solarradiation", default)]
    pub solar_radiation: Option<f64>,
    /// Observation time, epoch milliseconds UTC.
    #[serde(rename = "dateutc", default)]
    pub date_utc_ms: Option<i64>,
}

/// Fetch the device list for the configured account.
///
/// An empty list means no stations are registered; an error object in place
/// of the list fails shape validation and surfaces as `MalformedPayload`.
/// Either way the caller renders the station panel offline.
pub async fn fetch_devices(config: &AppConfig) -> Result<Vec<AmbientDevice>, FetchError> {
    info!("Fetching Ambient Weather device list");

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let resp = client
        .get(DEVICES_URL)
        .query(&[
            ("apiKey", config.ambient_api_key.as_str()),
            ("applicationKey", config.ambient_app_key.as_str()),
        ])
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let devices: Vec<AmbientDevice> = resp
        .json()
        .await
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    if devices.is_empty() {
        warn!("Ambient Weather returned no stations for this account");
    } else {
        info!("Ambient Weather returned {} station(s)", devices.len());
    }

    Ok(devices)
}
