use crate::data::PositionFix;
use crate::error::{check_status, Result, TrackingError, UpstreamError};
use crate::provider::{name_stem, PositionProvider, ProviderKind};
use crate::utils::clock::Clock;
use crate::utils::config::present;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

const DEFAULT_SPEED_KNOTS: f64 = 12.0;

/// Position record as returned by the AIS lookup service
///
/// Every field is optional; numbers may arrive as JSON numbers or strings.
#[derive(Debug, Default, Deserialize)]
struct AisPosition {
    vessel_name: Option<String>,
    lat: Option<Numeric>,
    lon: Option<Numeric>,
    speed: Option<Numeric>,
    course: Option<Numeric>,
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self, field: &str) -> std::result::Result<f64, UpstreamError> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| UpstreamError::Decode(format!("{field} is not a number: {s:?}")))?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(UpstreamError::Decode(format!("{field} is not finite")))
        }
    }
}

fn numeric_or(
    value: &Option<Numeric>,
    field: &str,
    default: f64,
) -> std::result::Result<f64, UpstreamError> {
    value.as_ref().map_or(Ok(default), |v| v.as_f64(field))
}

/// Accept RFC 3339 and zone-less ISO-8601 (read as UTC)
fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, UpstreamError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| UpstreamError::Decode(format!("unrecognized timestamp: {raw:?}")))
}

/// REST client for an AIS position service (AISHub-style `GET /position`)
pub struct ExternalProvider {
    client: Client,
    api_key: String,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl ExternalProvider {
    /// Create a provider from optional settings
    ///
    /// Missing endpoint or key is a configuration error; nothing is sent.
    pub fn from_config(
        endpoint: Option<&str>,
        api_key: Option<&str>,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        match (present(endpoint), present(api_key)) {
            (Some(endpoint), Some(api_key)) => {
                Self::new(endpoint, api_key.to_string(), timeout, clock)
            }
            _ => Err(TrackingError::Configuration(
                "AIS_ENDPOINT and AIS_API_KEY are required for the aishub provider".to_string(),
            )),
        }
    }

    pub fn new(
        endpoint: &str,
        api_key: String,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        Url::parse(endpoint).map_err(|e| {
            TrackingError::Configuration(format!("invalid AIS endpoint {endpoint:?}: {e}"))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackingError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: endpoint.trim_end_matches('/').to_string(),
            clock,
        })
    }

    async fn fetch(&self, identifier: &str) -> std::result::Result<AisPosition, UpstreamError> {
        let url = format!("{}/position", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str()), ("mmsi", identifier)])
            .send()
            .await
            .map_err(|e| UpstreamError::Http(e.without_url()))?;

        let response = check_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Http(e.without_url()))?;

        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    fn normalize(
        &self,
        identifier: &str,
        raw: AisPosition,
    ) -> std::result::Result<PositionFix, UpstreamError> {
        let lat = numeric_or(&raw.lat, "lat", 0.0)?.clamp(-90.0, 90.0);
        let lon = numeric_or(&raw.lon, "lon", 0.0)?.clamp(-180.0, 180.0);
        let speed_knots = numeric_or(&raw.speed, "speed", DEFAULT_SPEED_KNOTS)?.max(0.0);
        let course = numeric_or(&raw.course, "course", 0.0)?;
        let heading = (course.trunc() as i64).rem_euclid(360) as u16;

        let last_update = match raw.timestamp.as_deref() {
            Some(ts) if !ts.trim().is_empty() => parse_timestamp(ts)?,
            _ => self.clock.now(),
        };

        let vessel_name = raw
            .vessel_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("Vessel-{}", name_stem(identifier)));

        Ok(PositionFix {
            vessel_name,
            lat,
            lon,
            speed_knots,
            heading,
            last_update,
        })
    }
}

#[async_trait]
impl PositionProvider for ExternalProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::External
    }

    async fn resolve(&self, identifier: &str) -> Result<PositionFix> {
        info!("Looking up AIS position for {} at {}", identifier, self.base_url);

        let result = match self.fetch(identifier).await {
            Ok(raw) => self.normalize(identifier, raw),
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            error!("AIS lookup for {} failed: {}", identifier, e);
            TrackingError::Provider(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::FixedClock;
    use chrono::TimeZone;
    use mockito::Matcher;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 20, 6, 0, 0).unwrap()
    }

    fn provider(url: &str) -> ExternalProvider {
        ExternalProvider::from_config(
            Some(url),
            Some("secret"),
            Duration::from_secs(5),
            Arc::new(FixedClock(at())),
        )
        .unwrap()
    }

    #[test]
    fn test_requires_endpoint_and_key() {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(at()));
        let timeout = Duration::from_secs(1);

        for (endpoint, key) in [
            (None, None),
            (Some("http://localhost"), None),
            (None, Some("secret")),
            (Some("http://localhost"), Some("   ")),
        ] {
            let result = ExternalProvider::from_config(endpoint, key, timeout, clock.clone());
            assert!(matches!(result, Err(TrackingError::Configuration(_))));
        }
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = ExternalProvider::from_config(
            Some("not a url"),
            Some("secret"),
            Duration::from_secs(1),
            Arc::new(FixedClock(at())),
        );
        assert!(matches!(result, Err(TrackingError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_missing_settings_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let result = ExternalProvider::from_config(
            Some(server.url().as_str()),
            None,
            Duration::from_secs(1),
            Arc::new(FixedClock(at())),
        );

        assert!(matches!(result, Err(TrackingError::Configuration(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_full_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/position")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("apiKey".into(), "secret".into()),
                Matcher::UrlEncoded("mmsi".into(), "MSCU1234567".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "vessel_name": "MSC OSCAR",
                    "lat": 51.9,
                    "lon": "4.05",
                    "speed": 14.5,
                    "course": "271.9",
                    "timestamp": "2024-02-20T05:45:00Z"
                }"#,
            )
            .create_async()
            .await;

        // Trailing slash on the endpoint is tolerated
        let provider = provider(&format!("{}/", server.url()));
        let fix = provider.resolve("MSCU1234567").await.unwrap();

        mock.assert_async().await;
        assert_eq!(fix.vessel_name, "MSC OSCAR");
        assert_eq!(fix.lat, 51.9);
        assert_eq!(fix.lon, 4.05);
        assert_eq!(fix.speed_knots, 14.5);
        assert_eq!(fix.heading, 271);
        assert_eq!(fix.last_update, Utc.with_ymd_and_hms(2024, 2, 20, 5, 45, 0).unwrap());
    }

    #[tokio::test]
    async fn test_resolve_applies_defaults() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/position")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let fix = provider(&server.url()).resolve("HLCU1357913").await.unwrap();

        assert_eq!(fix.vessel_name, "Vessel-HLCU");
        assert_eq!(fix.lat, 0.0);
        assert_eq!(fix.lon, 0.0);
        assert_eq!(fix.speed_knots, 12.0);
        assert_eq!(fix.heading, 0);
        assert_eq!(fix.last_update, at());
    }

    #[tokio::test]
    async fn test_resolve_clamps_out_of_range() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/position")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"lat": 95.0, "lon": -200.0, "speed": -3, "course": 725}"#)
            .create_async()
            .await;

        let fix = provider(&server.url()).resolve("X").await.unwrap();

        assert_eq!(fix.lat, 90.0);
        assert_eq!(fix.lon, -180.0);
        assert_eq!(fix.speed_knots, 0.0);
        assert_eq!(fix.heading, 5);
    }

    #[tokio::test]
    async fn test_non_success_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/position")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("maintenance")
            .expect(1)
            .create_async()
            .await;

        let err = provider(&server.url()).resolve("MSCU1234567").await.unwrap_err();

        // Exactly one request: no retry
        mock.assert_async().await;
        match err {
            TrackingError::Provider(UpstreamError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/position")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"lat": "north"}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).resolve("MSCU1234567").await.unwrap_err();
        assert!(matches!(err, TrackingError::Provider(UpstreamError::Decode(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_is_provider_error() {
        // Nothing listens on the discard port
        let provider = provider("http://127.0.0.1:9");
        let err = provider.resolve("MSCU1234567").await.unwrap_err();
        assert!(matches!(err, TrackingError::Provider(UpstreamError::Http(_))));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 20, 5, 45, 0).unwrap();
        assert_eq!(parse_timestamp("2024-02-20T05:45:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-02-20T06:45:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-02-20T05:45:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-02-20 05:45:00.000").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
