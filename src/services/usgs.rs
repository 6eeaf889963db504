// src/services/usgs.rs
use log::info;
use serde::Deserialize;
use std::time::Duration;

use super::FetchError;
use crate::config::AppConfig;

const IV_URL: &str = "https://waterservices.usgs.gov/nwis/iv/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A confirmed measurement from the river gauge, as opposed to a forecast
/// or template value.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeReading {
    pub level_in: f64,
    pub source: String,
    pub site_id: String,
    pub observed_at: Option<String>,
}

// Instantaneous-values response. Only the path down to the first data
// point matters; everything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct IvResponse {
    value: IvValue,
}

#[derive(Debug, Deserialize)]
struct IvValue {
    #[serde(rename = "timeSeries")]
    time_series: Vec<IvTimeSeries>,
}

#[derive(Debug, Deserialize)]
struct IvTimeSeries {
    values: Vec<IvValueBlock>,
}

#[derive(Debug, Deserialize)]
struct IvValueBlock {
    value: Vec<IvPoint>,
}

#[derive(Debug, Deserialize)]
struct IvPoint {
    value: String,
    #[serde(rename = "dateTime", default)]
    date_time: Option<String>,
}

/// Fetch the latest reading for the configured site and parameter code.
/// Any structural deviation in the nested time-series is a `FetchError`.
pub async fn fetch_gauge_level(config: &AppConfig) -> Result<GaugeReading, FetchError> {
    info!(
        "Fetching USGS gauge level for site {}",
        config.usgs_site_id
    );

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let resp = client
        .get(IV_URL)
        .query(&[
            ("format", "json"),
            ("sites", config.usgs_site_id.as_str()),
            ("parameterCd", config.usgs_parameter_cd.as_str()),
        ])
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let payload: IvResponse = resp
        .json()
        .await
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    let reading = extract_reading(payload, &config.usgs_site_id)?;
    info!(
        "USGS site {} reading: {}\"",
        reading.site_id, reading.level_in
    );
    Ok(reading)
}

fn extract_reading(payload: IvResponse, site_id: &str) -> Result<GaugeReading, FetchError> {
    let point = payload
        .value
        .time_series
        .into_iter()
        .next()
        .and_then(|ts| ts.values.into_iter().next())
        .and_then(|block| block.value.into_iter().next())
        .ok_or_else(|| {
            FetchError::MalformedPayload("empty time series in USGS response".to_string())
        })?;

    let level_in = point.value.trim().parse::<f64>().map_err(|_| {
        FetchError::MalformedPayload(format!("non-numeric gauge value: {:?}", point.value))
    })?;

    Ok(GaugeReading {
        level_in,
        source: "USGS".to_string(),
        site_id: site_id.to_string(),
        observed_at: point.date_time,
    })
}
