pub mod kpis;
pub mod tracker;

pub use kpis::compute_kpis;
pub use tracker::Tracker;
