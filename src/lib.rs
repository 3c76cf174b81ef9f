pub mod data;
pub mod error;
pub mod eta;
pub mod fleet;
pub mod provider;
pub mod summary;
pub mod utils;
pub mod weather;

// Re-export commonly used types
pub use data::{
    Briefing, FleetKpis, PositionFix, RiskLevel, RouteProjection, ShipmentRow, Summary,
    SummaryRequest, TrackingReport, WeatherReport, Waypoint,
};
pub use error::{TrackingError, UpstreamError};
pub use eta::{project, project_at};
pub use fleet::Tracker;
pub use provider::{
    build_provider, CustomProvider, ExternalProvider, PositionProvider, ProviderKind,
    SyntheticProvider,
};
pub use summary::{build_summarizer, OpenAiSummarizer, SummaryGenerator, TemplateSummarizer};
pub use utils::{Clock, Config, FixedClock, SystemClock};
pub use weather::WeatherClient;
