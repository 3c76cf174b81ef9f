pub mod estimator;

pub use estimator::{
    distance_nm, next_waypoint, project, project_at, transit_hours, MIN_TRANSIT_HOURS,
};
