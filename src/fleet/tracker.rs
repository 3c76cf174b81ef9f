use crate::data::{
    Briefing, FleetKpis, ShipmentRow, Summary, SummaryRequest, TrackingReport, WeatherReport,
};
use crate::error::Result;
use crate::fleet::compute_kpis;
use crate::provider::{build_provider, PositionProvider};
use crate::summary::{build_summarizer, SummaryGenerator};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::config::ProviderConfig;
use crate::utils::Config;
use crate::weather::WeatherClient;
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Container tracking service
///
/// Composes the position provider, route projection, weather lookup and
/// summary generation. Holds no per-request state, so one instance can serve
/// concurrent callers.
///
/// A tracker wired from configuration builds its position provider on the
/// first position lookup, so weather and summaries work even when the
/// provider settings are incomplete.
pub struct Tracker {
    provider: OnceCell<Arc<dyn PositionProvider>>,
    provider_config: ProviderConfig,
    weather: WeatherClient,
    summarizer: Arc<dyn SummaryGenerator>,
    clock: Arc<dyn Clock>,
    fleet: Vec<String>,
}

impl Tracker {
    pub fn new(
        provider: Arc<dyn PositionProvider>,
        weather: WeatherClient,
        summarizer: Arc<dyn SummaryGenerator>,
        clock: Arc<dyn Clock>,
        fleet: Vec<String>,
    ) -> Self {
        Self {
            provider: OnceCell::new_with(Some(provider)),
            provider_config: ProviderConfig::default(),
            weather,
            summarizer,
            clock,
            fleet,
        }
    }

    /// Wire every collaborator from configuration, using the system clock
    ///
    /// Provider settings are checked on the first position lookup.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            provider: OnceCell::new(),
            provider_config: config.provider.clone(),
            weather: WeatherClient::from_config(&config.weather)?,
            summarizer: build_summarizer(&config.summary)?,
            clock: Arc::new(SystemClock),
            fleet: config.fleet.containers.clone(),
        })
    }

    async fn provider(&self) -> Result<&Arc<dyn PositionProvider>> {
        self.provider
            .get_or_try_init(|| async {
                build_provider(&self.provider_config, self.clock.clone())
            })
            .await
    }

    pub fn fleet(&self) -> &[String] {
        &self.fleet
    }

    /// Resolve a container and project its route
    pub async fn track(&self, container_id: &str) -> Result<TrackingReport> {
        let position = self.provider().await?.resolve(container_id).await?;
        let projection = position.project_at(self.clock.now());

        debug!(
            container_id,
            risk = %projection.risk,
            "Tracked {} at ({}, {})", position.vessel_name, position.lat, position.lon
        );

        Ok(TrackingReport {
            container_id: container_id.to_string(),
            position,
            projection,
        })
    }

    /// Track every configured container concurrently
    ///
    /// Rows come back in fleet order. The first failed lookup fails the listing.
    pub async fn shipments(&self) -> Result<Vec<ShipmentRow>> {
        info!("Tracking {} containers", self.fleet.len());

        let reports = join_all(self.fleet.iter().map(|id| self.track(id))).await;

        reports
            .into_iter()
            .map(|report| report.map(ShipmentRow::from))
            .collect()
    }

    pub async fn kpis(&self) -> Result<FleetKpis> {
        let rows = self.shipments().await?;
        Ok(compute_kpis(&rows, self.clock.now()))
    }

    pub async fn weather(&self, lat: f64, lon: f64) -> Result<WeatherReport> {
        self.weather.current(lat, lon).await
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> Result<Summary> {
        self.summarizer.summarize(request).await
    }

    /// Track a container, fetch weather at its position and summarize both
    pub async fn brief(&self, container_id: &str) -> Result<Briefing> {
        let tracking = self.track(container_id).await?;
        let weather = self
            .weather(tracking.position.lat, tracking.position.lon)
            .await?;

        let request = SummaryRequest {
            container_id: tracking.container_id.clone(),
            lat: tracking.position.lat,
            lon: tracking.position.lon,
            eta: tracking.projection.eta,
            weather: weather.clone(),
        };
        let summary = self.summarize(&request).await?;

        Ok(Briefing {
            tracking,
            weather,
            summary,
        })
    }
}
