pub mod clock;
pub mod config;
pub mod logger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use logger::{init_logger, init_from_config};
