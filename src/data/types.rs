use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Round to 5 decimal places, the precision used for every coordinate we emit
pub fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// Current position of a vessel carrying a container
///
/// Produced fresh on every lookup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub vessel_name: String,
    pub lat: f64,  // [-90, 90]
    pub lon: f64,  // [-180, 180]
    pub speed_knots: f64,
    pub heading: u16,  // [0, 360)
    pub last_update: DateTime<Utc>,
}

impl PositionFix {
    /// Compare everything except the wall-clock timestamp
    pub fn same_position(&self, other: &PositionFix) -> bool {
        self.vessel_name == other.vessel_name
            && self.lat == other.lat
            && self.lon == other.lon
            && self.speed_knots == other.speed_knots
            && self.heading == other.heading
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
}

/// Delay risk tier derived from projected transit time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a transit time in hours. Boundaries are inclusive on the lower tier.
    pub fn from_hours(hours: f64) -> Self {
        if hours <= 24.0 {
            RiskLevel::Low
        } else if hours <= 48.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projected next waypoint, arrival time and risk for a position fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProjection {
    pub eta: DateTime<Utc>,
    pub risk: RiskLevel,
    pub next_waypoint: Waypoint,
}

/// Merged result of a single container lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingReport {
    pub container_id: String,
    #[serde(flatten)]
    pub position: PositionFix,
    #[serde(flatten)]
    pub projection: RouteProjection,
}

/// One row of the fleet listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRow {
    pub container_id: String,
    pub vessel_name: String,
    pub lat: f64,
    pub lon: f64,
    pub eta: DateTime<Utc>,
    pub risk: RiskLevel,
    pub last_update: DateTime<Utc>,
}

impl From<TrackingReport> for ShipmentRow {
    fn from(report: TrackingReport) -> Self {
        Self {
            container_id: report.container_id,
            vessel_name: report.position.vessel_name,
            lat: report.position.lat,
            lon: report.position.lon,
            eta: report.projection.eta,
            risk: report.projection.risk,
            last_update: report.position.last_update,
        }
    }
}

/// Aggregate indicators over the tracked fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetKpis {
    pub total_containers: usize,
    pub on_time_pct: f64,
    pub high_risk: usize,
    pub avg_hours_to_eta: Option<f64>,
}

/// Current conditions at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
    pub winddirection: Option<f64>,
    pub weathercode: Option<i64>,
    pub time: Option<String>,
    pub source: String,
}

/// Input for the natural-language status summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub container_id: String,
    pub lat: f64,
    pub lon: f64,
    pub eta: DateTime<Utc>,
    pub weather: WeatherReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub summary: String,
    pub provider: String,  // "openai" or "template"
}

/// Everything known about one container: position, route, weather and summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Briefing {
    pub tracking: TrackingReport,
    pub weather: WeatherReport,
    pub summary: Summary,
}
