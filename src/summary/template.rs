use crate::data::{Summary, SummaryRequest};
use crate::error::Result;
use crate::summary::SummaryGenerator;
use async_trait::async_trait;

pub const PROVIDER_NAME: &str = "template";

/// Fixed-text summary that needs no external service
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSummarizer;

impl TemplateSummarizer {
    pub fn render(request: &SummaryRequest) -> Summary {
        let temperature = display_or_na(request.weather.temperature);
        let wind = display_or_na(request.weather.windspeed);

        let text = format!(
            "Container {} is near ({:.4}, {:.4}) with ETA {}. \
             Conditions: {}°C, wind {} km/h. Stay in routine monitoring; \
             escalate if winds exceed 30 km/h or ETA drifts by >6 hours.",
            request.container_id,
            request.lat,
            request.lon,
            request.eta.to_rfc3339(),
            temperature,
            wind,
        );

        Summary {
            summary: text,
            provider: PROVIDER_NAME.to_string(),
        }
    }
}

fn display_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

#[async_trait]
impl SummaryGenerator for TemplateSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<Summary> {
        Ok(Self::render(request))
    }
}
