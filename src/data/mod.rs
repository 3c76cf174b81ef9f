pub mod types;

pub use types::{
    round5, Briefing, FleetKpis, PositionFix, RiskLevel, RouteProjection, ShipmentRow, Summary,
    SummaryRequest, TrackingReport, WeatherReport, Waypoint,
};
