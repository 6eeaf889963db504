// src/models.rs
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Daily report artifact (produced by the out-of-process batch job)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub active_alerts: Vec<WeatherAlert>,
    pub current_conditions: CurrentConditions,
    pub soil_moisture: SoilMoisture,
    pub activity_recommendations: ActivityRecommendations,
    #[serde(default)]
    pub forecast_7day: Vec<ForecastDay>,
    #[serde(default)]
    pub optimal_work_windows: OptimalWorkWindows,
    pub swppp_compliance: SwpppCompliance,
    #[serde(default)]
    pub site_info: SiteInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub event: String,
    pub severity: String,
    pub headline: String,
    #[serde(default)]
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_f: f64,
    pub wind_speed_mph: f64,
    pub wind_direction: String,
    pub humidity_percent: f64,
    pub precipitation_24h: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilMoisture {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecommendations {
    pub concrete_pouring: ActivityRecommendation,
    pub grading_excavation: ActivityRecommendation,
    pub crane_ops: ActivityRecommendation,
    pub asphalt_paving: ActivityRecommendation,
    pub painting_coating: ActivityRecommendation,
    #[serde(default)]
    pub general_safety: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecommendation {
    pub status: ActivityStatus,
    pub notes: Vec<String>,
}

/// Per-activity call made by the report job. Passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityStatus {
    Go,
    Caution,
    Stop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub date: String,
    pub high: f64,
    pub low: f64,
    pub precipitation_prob: String,
    pub wind_speed: String,
    pub short_forecast: String,
    #[serde(default)]
    pub detailed_forecast: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimalWorkWindows {
    #[serde(default)]
    pub concrete_pouring: Vec<String>,
    #[serde(default)]
    pub grading: Vec<String>,
    #[serde(default)]
    pub painting: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpppCompliance {
    pub map_labels: Vec<MapLabel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLabel {
    pub label: String,
    pub priority: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(default)]
    pub gauge: String,
}

// ---------------------------------------------------------------------------
// Weekly planning template
// ---------------------------------------------------------------------------

/// Baseline plan for one weekday. Live truth readings override the `truth`
/// placeholder; everything else stands unless the directive rules fire.
#[derive(Debug, Clone)]
pub struct DayTemplate {
    pub status: String,
    pub color: String,
    pub high_f: i32,
    pub low_f: i32,
    pub precip_prob: String,
    pub expected_in: String,
    pub truth: String,
    pub task: String,
}

impl DayTemplate {
    #[allow(clippy::too_many_arguments)]
    fn new(
        status: &str,
        color: &str,
        high_f: i32,
        low_f: i32,
        precip_prob: &str,
        expected_in: &str,
        truth: &str,
        task: &str,
    ) -> Self {
        Self {
            status: status.to_string(),
            color: color.to_string(),
            high_f,
            low_f,
            precip_prob: precip_prob.to_string(),
            expected_in: expected_in.to_string(),
            truth: truth.to_string(),
            task: task.to_string(),
        }
    }
}

/// Static weekday -> baseline mapping with a total lookup: a weekday missing
/// from the map resolves to the fallback entry, never an error.
#[derive(Debug, Clone)]
pub struct WeeklyTemplate {
    days: HashMap<Weekday, DayTemplate>,
    fallback: DayTemplate,
}

impl WeeklyTemplate {
    pub fn new(days: HashMap<Weekday, DayTemplate>, fallback: DayTemplate) -> Self {
        Self { days, fallback }
    }

    pub fn baseline(&self, day: Weekday) -> &DayTemplate {
        self.days.get(&day).unwrap_or(&self.fallback)
    }

    /// Site plan for the Cullowhee project week. Sunday doubles as the
    /// fallback entry for any weekday without its own row.
    pub fn cullowhee() -> Self {
        let sunday = DayTemplate::new(
            "RECOVERY",
            "#FFFF00",
            58,
            28,
            "20%",
            "0.05\"",
            "TBD",
            "Drying: Temperature Drop / Monitor Soil",
        );

        let mut days = HashMap::new();
        days.insert(
            Weekday::Mon,
            DayTemplate::new(
                "STABLE",
                "#00FFCC",
                55,
                32,
                "1%",
                "0.00\"",
                "0.00\"",
                "Completed: Site Maintenance",
            ),
        );
        days.insert(
            Weekday::Tue,
            DayTemplate::new(
                "STABLE",
                "#00FFCC",
                60,
                38,
                "2%",
                "0.00\"",
                "0.00\"",
                "Completed: Silt Fence Audit",
            ),
        );
        days.insert(
            Weekday::Wed,
            DayTemplate::new(
                "STABLE",
                "#00FFCC",
                68,
                40,
                "1%",
                "0.00\"",
                "TBD",
                "VERIFIED DRY: Resume Standard Ops",
            ),
        );
        days.insert(
            Weekday::Thu,
            DayTemplate::new(
                "STABLE",
                "#00FFCC",
                62,
                39,
                "0%",
                "0.00\"",
                "TBD",
                "Operational: Clear skies forecast",
            ),
        );
        days.insert(
            Weekday::Fri,
            DayTemplate::new(
                "RESTRICTED",
                "#FF8C00",
                70,
                52,
                "25%",
                "0.02\"",
                "TBD",
                "Caution: Evening showers possible",
            ),
        );
        days.insert(
            Weekday::Sat,
            DayTemplate::new(
                "CRITICAL",
                "#FF0000",
                72,
                54,
                "65%",
                "0.20\"",
                "TBD",
                "Alert: Mountain Thunderstorms / Runoff Risk",
            ),
        );
        days.insert(Weekday::Sun, sunday.clone());

        Self::new(days, sunday)
    }
}

// ---------------------------------------------------------------------------
// Unified display model (merge engine output)
// ---------------------------------------------------------------------------

/// Top-level operational status for the current day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub status: String,
    pub color: String,
}

/// One day of the rolling 7-day window: the template baseline plus any live
/// truth override. `parse_error` marks a day whose template probability
/// could not be parsed.
#[derive(Debug, Clone, Serialize)]
pub struct DayOutlook {
    pub day: String,
    pub date: String,
    pub status: String,
    pub color: String,
    pub high_f: i32,
    pub low_f: i32,
    pub precip_prob: Option<u32>,
    pub expected_in: String,
    pub truth: String,
    pub task: String,
    pub parse_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Moderate,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaggedAlert {
    pub event: String,
    pub severity: String,
    pub headline: String,
    pub instruction: String,
    pub priority: AlertPriority,
}

/// Live station metrics, pre-formatted for display. Absent sensors render
/// as the `--` placeholder; numeric values are never synthesized.
#[derive(Debug, Clone, Serialize)]
pub struct StationPanel {
    pub online: bool,
    pub station: String,
    pub temperature_f: String,
    pub humidity_percent: String,
    pub wind_speed_mph: String,
    pub wind_gust_mph: String,
    pub wind_dir_deg: String,
    pub rain_today_in: String,
    pub pressure_inhg: String,
    pub uv_index: String,
    pub solar_wm2: String,
    pub observed_at_utc: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugePanel {
    pub display: String,
    pub level_in: Option<f64>,
    pub source: String,
    pub site_id: String,
    pub confirmed_precip: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompliancePoint {
    pub label: String,
    pub priority: String,
    pub lat: f64,
    pub lon: f64,
    pub color: [u8; 3],
}

/// Everything the dashboard frontend needs for one render, with all
/// defaulting already applied. No field is ever "missing" downstream.
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedState {
    pub generated_at: DateTime<Utc>,
    pub directive: Directive,
    pub outlook: Vec<DayOutlook>,
    pub station: StationPanel,
    pub gauge: GaugePanel,
    pub alerts: Vec<TaggedAlert>,
    pub current_conditions: CurrentConditions,
    pub soil_moisture: SoilMoisture,
    pub recommendations: ActivityRecommendations,
    pub forecast: Vec<ForecastDay>,
    pub work_windows: OptimalWorkWindows,
    pub compliance_points: Vec<CompliancePoint>,
    pub site_info: SiteInfo,
}
