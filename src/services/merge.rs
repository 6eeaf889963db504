// src/services/merge.rs
//
// Truth merge engine: combines the weekly template, the daily report
// artifact, and whatever live truth the feeds produced this cycle into one
// UnifiedState. Feed failures degrade to placeholders here; they never
// propagate further.
use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use log::warn;
use std::fmt;

use crate::config::AppConfig;
use crate::models::{
    AlertPriority, CompliancePoint, DailyReport, DayOutlook, DayTemplate, Directive, GaugePanel,
    StationPanel, SwpppCompliance, TaggedAlert, UnifiedState, WeatherAlert,
};
use crate::services::ambient::{AmbientDevice, StationReading};
use crate::services::usgs::GaugeReading;

/// Display placeholder for any value with no live reading behind it.
pub const PLACEHOLDER: &str = "--";

const PRE_STORM_STATUS: &str = "PRE-STORM ADVISORY";
const PRE_STORM_COLOR: &str = "#FFD700";
const RAIN_POP_THRESHOLD: u32 = 60;

const HIGH_PRIORITY_COLOR: [u8; 3] = [230, 0, 0];
const STANDARD_PRIORITY_COLOR: [u8; 3] = [255, 165, 0];

/// A malformed numeric field inside otherwise well-formed data. Marks the
/// affected day as degraded instead of coercing to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub field: String,
    pub value: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not parse {} value {:?} as a percentage",
            self.field, self.value
        )
    }
}

impl std::error::Error for ParseError {}

/// Build the unified display model for the rolling 7-day window starting
/// at `now` (site-local).
pub fn build_unified_state(
    config: &AppConfig,
    report: &DailyReport,
    station: Option<&AmbientDevice>,
    gauge: Option<&GaugeReading>,
    now: DateTime<Tz>,
) -> UnifiedState {
    let template = &config.template;

    let mut outlook = Vec::with_capacity(7);
    for offset in 0..7i64 {
        let date = now + chrono::Duration::days(offset);
        let tpl = template.baseline(date.weekday());

        let (precip_prob, parse_error) = match parse_percent(&tpl.precip_prob) {
            Ok(prob) => (Some(prob), None),
            Err(e) => {
                warn!("Degraded outlook for {}: {}", date.format("%a"), e);
                (None, Some(e.to_string()))
            }
        };

        // Live truth overlays the template only for today; future days keep
        // their placeholder until a reading confirms them.
        let truth = if offset == 0 {
            match gauge {
                Some(g) => format!("{:.2}\" (USGS)", g.level_in),
                None => tpl.truth.clone(),
            }
        } else {
            tpl.truth.clone()
        };

        outlook.push(DayOutlook {
            day: date.format("%a").to_string(),
            date: date.format("%m/%d").to_string(),
            status: tpl.status.clone(),
            color: tpl.color.clone(),
            high_f: tpl.high_f,
            low_f: tpl.low_f,
            precip_prob,
            expected_in: tpl.expected_in.clone(),
            truth,
            task: tpl.task.clone(),
            parse_error,
        });
    }

    let today_tpl = template.baseline(now.weekday());
    let directive = derive_directive(today_tpl, outlook[0].precip_prob, gauge);

    UnifiedState {
        generated_at: Utc::now(),
        directive,
        outlook,
        station: station_panel(station),
        gauge: gauge_panel(gauge, &config.usgs_site_id),
        alerts: classify_alerts(&report.active_alerts),
        current_conditions: report.current_conditions.clone(),
        soil_moisture: report.soil_moisture.clone(),
        recommendations: report.activity_recommendations.clone(),
        forecast: report.forecast_7day.clone(),
        work_windows: report.optimal_work_windows.clone(),
        compliance_points: compliance_points(&report.swppp_compliance),
        site_info: report.site_info.clone(),
    }
}

/// Today's operational directive.
///
/// Forecast risk above the threshold with no confirmed nonzero gauge
/// reading means rain is expected but the ground has not seen it yet: the
/// pre-storm advisory overrides the templated status. A confirmed nonzero
/// reading always yields the template status.
pub fn derive_directive(
    tpl: &DayTemplate,
    precip_prob: Option<u32>,
    gauge: Option<&GaugeReading>,
) -> Directive {
    let confirmed_nonzero = gauge.map_or(false, |g| g.level_in > 0.0);

    match precip_prob {
        Some(prob) if prob > RAIN_POP_THRESHOLD && !confirmed_nonzero => Directive {
            status: PRE_STORM_STATUS.to_string(),
            color: PRE_STORM_COLOR.to_string(),
        },
        _ => Directive {
            status: tpl.status.clone(),
            color: tpl.color.clone(),
        },
    }
}

/// Parse a probability string like "65%". One trailing percent sign is
/// stripped; anything that then fails integer parsing is an error, never a
/// silent zero.
pub fn parse_percent(raw: &str) -> Result<u32, ParseError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed);
    digits.trim().parse::<u32>().map_err(|_| ParseError {
        field: "precip_prob".to_string(),
        value: raw.to_string(),
    })
}

/// Severity "Severe" or "Extreme" is high priority; everything else is
/// moderate. This is the sole classification rule.
pub fn alert_priority(severity: &str) -> AlertPriority {
    match severity {
        "Severe" | "Extreme" => AlertPriority::High,
        _ => AlertPriority::Moderate,
    }
}

pub fn classify_alerts(alerts: &[WeatherAlert]) -> Vec<TaggedAlert> {
    alerts
        .iter()
        .map(|alert| TaggedAlert {
            event: alert.event.clone(),
            severity: alert.severity.clone(),
            headline: alert.headline.clone(),
            instruction: alert.instruction.clone(),
            priority: alert_priority(&alert.severity),
        })
        .collect()
}

/// Map the first station's latest sample into display strings. A missing
/// device (fetch failure or empty account) renders the panel offline with
/// every metric at the placeholder.
pub fn station_panel(device: Option<&AmbientDevice>) -> StationPanel {
    let (online, station, last) = match device {
        Some(d) => {
            let name = d
                .info
                .as_ref()
                .and_then(|i| i.name.clone())
                .or_else(|| d.mac_address.clone())
                .unwrap_or_else(|| "Local PWS".to_string());
            (true, name, d.last_data.clone())
        }
        None => (false, "Local PWS".to_string(), StationReading::default()),
    };

    StationPanel {
        online,
        station,
        temperature_f: metric(last.tempf),
        humidity_percent: metric(last.humidity),
        wind_speed_mph: metric(last.wind_speed_mph),
        wind_gust_mph: metric(last.wind_gust_mph),
        wind_dir_deg: metric(last.wind_dir),
        rain_today_in: metric(last.daily_rain_in),
        pressure_inhg: metric(last.pressure_inhg),
        uv_index: metric(last.uv_index),
        solar_wm2: metric(last.solar_radiation),
        observed_at_utc: last.date_utc_ms.and_then(format_epoch_ms),
    }
}

pub fn gauge_panel(gauge: Option<&GaugeReading>, site_id: &str) -> GaugePanel {
    match gauge {
        Some(g) => GaugePanel {
            display: format!("{:.2}\"", g.level_in),
            level_in: Some(g.level_in),
            source: g.source.clone(),
            site_id: g.site_id.clone(),
            confirmed_precip: g.level_in > 0.0,
        },
        None => GaugePanel {
            display: PLACEHOLDER.to_string(),
            level_in: None,
            source: "USGS".to_string(),
            site_id: site_id.to_string(),
            confirmed_precip: false,
        },
    }
}

/// Inspection points keep an explicit color when the record carries one;
/// otherwise "High" priority gets red and everything else orange.
pub fn compliance_points(compliance: &SwpppCompliance) -> Vec<CompliancePoint> {
    compliance
        .map_labels
        .iter()
        .map(|point| CompliancePoint {
            label: point.label.clone(),
            priority: point.priority.clone(),
            lat: point.lat,
            lon: point.lon,
            color: point.color.unwrap_or(if point.priority == "High" {
                HIGH_PRIORITY_COLOR
            } else {
                STANDARD_PRIORITY_COLOR
            }),
        })
        .collect()
}

fn metric(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

fn format_epoch_ms(ms: i64) -> Option<String> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%A, %B %d, %Y at %I:%M %p UTC").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MapLabel, WeeklyTemplate};
    use chrono::Weekday;
    use chrono_tz::America::New_York;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn test_config() -> AppConfig {
        AppConfig {
            ambient_api_key: "test-api-key".to_string(),
            ambient_app_key: "test-app-key".to_string(),
            usgs_site_id: "03439000".to_string(),
            usgs_parameter_cd: "00045".to_string(),
            report_path: PathBuf::from("latest_report.json"),
            feed_ttl_secs: 300,
            refresh_secs: 300,
            site_tz: New_York,
            template: WeeklyTemplate::cullowhee(),
        }
    }

    fn sample_report() -> DailyReport {
        serde_json::from_value(serde_json::json!({
            "last_updated": "2026-08-01T08:30:00",
            "active_alerts": [],
            "current_conditions": {
                "temperature_f": 72.0,
                "wind_speed_mph": 5.0,
                "wind_direction": "SW",
                "humidity_percent": 60.0,
                "precipitation_24h": 0.0
            },
            "soil_moisture": {"status": "DRY"},
            "activity_recommendations": {
                "concrete_pouring": {"status": "GO", "notes": []},
                "grading_excavation": {"status": "GO", "notes": []},
                "crane_ops": {"status": "GO", "notes": []},
                "asphalt_paving": {"status": "GO", "notes": []},
                "painting_coating": {"status": "GO", "notes": []},
                "general_safety": []
            },
            "swppp_compliance": {"map_labels": []}
        }))
        .unwrap()
    }

    fn gauge(level_in: f64) -> GaugeReading {
        GaugeReading {
            level_in,
            source: "USGS".to_string(),
            site_id: "03439000".to_string(),
            observed_at: None,
        }
    }

    // 2026-08-01 is a Saturday; the Saturday template has a 65% rain
    // probability, above the advisory threshold.
    fn saturday() -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2026, 8, 1, 6, 0, 0).unwrap()
    }

    #[test]
    fn parse_percent_accepts_suffixed_integers() {
        assert_eq!(parse_percent("65%"), Ok(65));
        assert_eq!(parse_percent("0%"), Ok(0));
        assert_eq!(parse_percent(" 25% "), Ok(25));
        assert_eq!(parse_percent("100"), Ok(100));
    }

    #[test]
    fn parse_percent_rejects_garbage() {
        assert!(parse_percent("N/A%").is_err());
        assert!(parse_percent("%").is_err());
        assert!(parse_percent("").is_err());
        assert!(parse_percent("-5%").is_err());
    }

    #[test]
    fn missing_weekday_falls_back_to_default_day() {
        let sunday = DayTemplate {
            status: "RECOVERY".to_string(),
            color: "#FFFF00".to_string(),
            high_f: 58,
            low_f: 28,
            precip_prob: "20%".to_string(),
            expected_in: "0.05\"".to_string(),
            truth: "TBD".to_string(),
            task: "fallback".to_string(),
        };
        let template = WeeklyTemplate::new(HashMap::new(), sunday);

        let looked_up = template.baseline(Weekday::Wed);
        assert_eq!(looked_up.status, "RECOVERY");
        assert_eq!(looked_up.task, "fallback");
    }

    #[test]
    fn advisory_when_rain_forecast_and_no_confirmed_reading() {
        let config = test_config();
        let tpl = config.template.baseline(Weekday::Sat);

        let dry = gauge(0.0);
        let directive = derive_directive(tpl, Some(65), Some(&dry));
        assert_eq!(directive.status, PRE_STORM_STATUS);
        assert_eq!(directive.color, PRE_STORM_COLOR);

        // A failed fetch is also "no confirmed reading".
        let directive = derive_directive(tpl, Some(65), None);
        assert_eq!(directive.status, PRE_STORM_STATUS);
    }

    #[test]
    fn template_status_when_gauge_confirms_rain() {
        let config = test_config();
        let tpl = config.template.baseline(Weekday::Sat);

        let wet = gauge(1.2);
        let directive = derive_directive(tpl, Some(65), Some(&wet));
        assert_eq!(directive.status, "CRITICAL");
        assert_eq!(directive.color, "#FF0000");
    }

    #[test]
    fn template_status_when_forecast_risk_is_low() {
        let config = test_config();
        let tpl = config.template.baseline(Weekday::Mon);

        let directive = derive_directive(tpl, Some(1), None);
        assert_eq!(directive.status, "STABLE");
    }

    #[test]
    fn unified_state_directive_follows_gauge_truth() {
        let config = test_config();
        let report = sample_report();

        let state = build_unified_state(&config, &report, None, None, saturday());
        assert_eq!(state.directive.status, PRE_STORM_STATUS);

        let wet = gauge(1.2);
        let state = build_unified_state(&config, &report, None, Some(&wet), saturday());
        assert_eq!(state.directive.status, "CRITICAL");
    }

    #[test]
    fn today_truth_overlaid_only_when_gauge_succeeded() {
        let config = test_config();
        let report = sample_report();

        let reading = gauge(0.85);
        let state = build_unified_state(&config, &report, None, Some(&reading), saturday());
        assert_eq!(state.outlook.len(), 7);
        assert_eq!(state.outlook[0].truth, "0.85\" (USGS)");
        // Tomorrow (Sunday) keeps its template placeholder.
        assert_eq!(state.outlook[1].truth, "TBD");

        let state = build_unified_state(&config, &report, None, None, saturday());
        assert_eq!(state.outlook[0].truth, "TBD");
    }

    #[test]
    fn malformed_probability_marks_day_degraded() {
        let mut config = test_config();
        let broken = DayTemplate {
            status: "STABLE".to_string(),
            color: "#00FFCC".to_string(),
            high_f: 60,
            low_f: 40,
            precip_prob: "N/A%".to_string(),
            expected_in: "0.00\"".to_string(),
            truth: "TBD".to_string(),
            task: "test".to_string(),
        };
        config.template = WeeklyTemplate::new(HashMap::new(), broken);

        let report = sample_report();
        let state = build_unified_state(&config, &report, None, None, saturday());

        for day in &state.outlook {
            assert_eq!(day.precip_prob, None);
            assert!(day.parse_error.is_some());
        }
        // Directive falls back to the template status instead of guessing.
        assert_eq!(state.directive.status, "STABLE");
    }

    #[test]
    fn severe_and_extreme_are_high_priority() {
        assert_eq!(alert_priority("Severe"), AlertPriority::High);
        assert_eq!(alert_priority("Extreme"), AlertPriority::High);
        assert_eq!(alert_priority("Moderate"), AlertPriority::Moderate);
        assert_eq!(alert_priority("Minor"), AlertPriority::Moderate);
        assert_eq!(alert_priority("Unknown"), AlertPriority::Moderate);
    }

    #[test]
    fn compliance_colors_default_by_priority() {
        let compliance = SwpppCompliance {
            map_labels: vec![
                MapLabel {
                    label: "Silt Fence A".to_string(),
                    priority: "High".to_string(),
                    lat: 35.3079,
                    lon: -83.1746,
                    color: None,
                },
                MapLabel {
                    label: "Inlet B".to_string(),
                    priority: "Low".to_string(),
                    lat: 35.3081,
                    lon: -83.1750,
                    color: None,
                },
                MapLabel {
                    label: "Outfall C".to_string(),
                    priority: "High".to_string(),
                    lat: 35.3085,
                    lon: -83.1752,
                    color: Some([0, 0, 255]),
                },
            ],
        };

        let points = compliance_points(&compliance);
        assert_eq!(points[0].color, [230, 0, 0]);
        assert_eq!(points[1].color, [255, 165, 0]);
        // An explicit color is never overridden.
        assert_eq!(points[2].color, [0, 0, 255]);
    }

    #[test]
    fn station_panel_defaults_missing_sensors() {
        let raw = r#"{
            "macAddress": "00:11:22:33:44:55",
            "info": {"name": "NCCAT Ridge"},
            "lastData": {"tempf": 71.2}
        }"#;
        let device: AmbientDevice = serde_json::from_str(raw).unwrap();

        let panel = station_panel(Some(&device));
        assert!(panel.online);
        assert_eq!(panel.station, "NCCAT Ridge");
        assert_eq!(panel.temperature_f, "71.2");
        assert_eq!(panel.humidity_percent, PLACEHOLDER);
        assert_eq!(panel.uv_index, PLACEHOLDER);
    }

    #[test]
    fn station_panel_offline_when_no_device() {
        let panel = station_panel(None);
        assert!(!panel.online);
        assert_eq!(panel.temperature_f, PLACEHOLDER);
        assert_eq!(panel.rain_today_in, PLACEHOLDER);
        assert_eq!(panel.observed_at_utc, None);
    }

    #[test]
    fn gauge_panel_degrades_to_placeholder() {
        let panel = gauge_panel(None, "03439000");
        assert_eq!(panel.display, PLACEHOLDER);
        assert_eq!(panel.level_in, None);
        assert!(!panel.confirmed_precip);
        assert_eq!(panel.site_id, "03439000");

        let reading = gauge(0.85);
        let panel = gauge_panel(Some(&reading), "03439000");
        assert_eq!(panel.display, "0.85\"");
        assert!(panel.confirmed_precip);
    }
}
