use crate::data::{FleetKpis, RiskLevel, ShipmentRow};
use chrono::{DateTime, Utc};

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fleet indicators as of `now`
///
/// - on-time share counts LOW-risk shipments, as a percentage with one decimal
/// - high risk counts HIGH-risk shipments
/// - average hours to ETA floors past ETAs at zero; `None` for an empty fleet
pub fn compute_kpis(rows: &[ShipmentRow], now: DateTime<Utc>) -> FleetKpis {
    let total = rows.len();
    let on_time = rows.iter().filter(|r| r.risk == RiskLevel::Low).count();
    let high_risk = rows.iter().filter(|r| r.risk == RiskLevel::High).count();

    let on_time_pct = if total > 0 {
        round1(on_time as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    let hours: Vec<f64> = rows
        .iter()
        .map(|r| ((r.eta - now).num_milliseconds() as f64 / 3_600_000.0).max(0.0))
        .collect();

    let avg_hours_to_eta = if hours.is_empty() {
        None
    } else {
        Some(round1(hours.iter().sum::<f64>() / hours.len() as f64))
    };

    FleetKpis {
        total_containers: total,
        on_time_pct,
        high_risk,
        avg_hours_to_eta,
    }
}
