use crate::data::{round5, PositionFix, RiskLevel, RouteProjection, Waypoint};
use chrono::{DateTime, Duration, Utc};

/// Projected legs never take less than this
pub const MIN_TRANSIT_HOURS: f64 = 6.0;

const WAYPOINT_STEP_LAT: f64 = 2.5;
const WAYPOINT_STEP_LON: f64 = 3.0;
const WAYPOINT_MAX_LAT: f64 = 80.0;
const WAYPOINT_MAX_LON: f64 = 179.0;
const NM_PER_DEGREE: f64 = 60.0;
const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Next waypoint: a fixed step north-east, clamped to navigable bounds (unrounded)
pub fn next_waypoint(lat: f64, lon: f64) -> Waypoint {
    Waypoint {
        lat: (lat + WAYPOINT_STEP_LAT).clamp(-WAYPOINT_MAX_LAT, WAYPOINT_MAX_LAT),
        lon: (lon + WAYPOINT_STEP_LON).clamp(-WAYPOINT_MAX_LON, WAYPOINT_MAX_LON),
    }
}

/// Flat-plane distance in nautical miles, one degree counted as 60 nm
///
/// Not a great-circle distance.
pub fn distance_nm(from: Waypoint, to: Waypoint) -> f64 {
    let dlat = to.lat - from.lat;
    let dlon = to.lon - from.lon;
    (dlat * dlat + dlon * dlon).sqrt() * NM_PER_DEGREE
}

/// Hours to cover `dist_nm`; speeds below 1 knot count as 1
pub fn transit_hours(dist_nm: f64, speed_knots: f64) -> f64 {
    (dist_nm / speed_knots.max(1.0)).max(MIN_TRANSIT_HOURS)
}

/// `now + hours`, saturating at the latest representable instant
fn eta_after(now: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    let micros = (hours * MICROS_PER_HOUR).round();
    if !(micros < i64::MAX as f64) {
        return DateTime::<Utc>::MAX_UTC;
    }

    now.checked_add_signed(Duration::microseconds(micros as i64))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Project the route from a position, with the ETA anchored at `now`
///
/// Never fails: legs too long to represent put the ETA at `DateTime::<Utc>::MAX_UTC`.
pub fn project_at(lat: f64, lon: f64, speed_knots: f64, now: DateTime<Utc>) -> RouteProjection {
    let here = Waypoint { lat, lon };
    let next = next_waypoint(lat, lon);
    let hours = transit_hours(distance_nm(here, next), speed_knots);

    RouteProjection {
        eta: eta_after(now, hours),
        risk: RiskLevel::from_hours(hours),
        next_waypoint: Waypoint {
            lat: round5(next.lat),
            lon: round5(next.lon),
        },
    }
}

/// Project the route from a position, with the ETA anchored at the current time
pub fn project(lat: f64, lon: f64, speed_knots: f64) -> RouteProjection {
    project_at(lat, lon, speed_knots, Utc::now())
}

impl PositionFix {
    pub fn project_at(&self, now: DateTime<Utc>) -> RouteProjection {
        project_at(self.lat, self.lon, self.speed_knots, now)
    }
}
