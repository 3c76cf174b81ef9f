use crate::data::WeatherReport;
use crate::error::{check_status, Result, TrackingError, UpstreamError};
use crate::utils::config::WeatherConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

const SOURCE: &str = "open-meteo";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentWeather {
    temperature: Option<f64>,
    windspeed: Option<f64>,
    winddirection: Option<f64>,
    weathercode: Option<i64>,
    time: Option<String>,
}

/// Open-Meteo current conditions client
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackingError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Current conditions at a coordinate
    ///
    /// A response without a `current_weather` block yields an all-empty report.
    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherReport> {
        info!("Fetching weather at ({:.4}, {:.4})", lat, lon);

        self.fetch(lat, lon).await.map_err(|e| {
            error!("Weather fetch failed: {}", e);
            TrackingError::Weather(e)
        })
    }

    async fn fetch(&self, lat: f64, lon: f64) -> std::result::Result<WeatherReport, UpstreamError> {
        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        let forecast: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))?;
        let current = forecast.current_weather.unwrap_or_default();

        Ok(WeatherReport {
            temperature: current.temperature,
            windspeed: current.windspeed,
            winddirection: current.winddirection,
            weathercode: current.weathercode,
            time: current.time,
            source: SOURCE.to_string(),
        })
    }
}
