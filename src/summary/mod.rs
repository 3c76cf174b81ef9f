pub mod openai;
pub mod template;

pub use openai::OpenAiSummarizer;
pub use template::TemplateSummarizer;

use crate::data::{Summary, SummaryRequest};
use crate::error::Result;
use crate::utils::config::{present, SummaryConfig};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Text-generation backend producing a short status summary for a container
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<Summary>;
}

/// Language model when an API key is configured, template otherwise
pub fn build_summarizer(config: &SummaryConfig) -> Result<Arc<dyn SummaryGenerator>> {
    match present(config.api_key.as_deref()) {
        Some(api_key) => {
            info!("Summaries via {} at {}", config.model, config.base_url);
            Ok(Arc::new(OpenAiSummarizer::new(config, api_key.to_string())?))
        }
        None => {
            info!("Summaries via template");
            Ok(Arc::new(TemplateSummarizer))
        }
    }
}

/// Instruction text sent to the language model
pub(crate) fn build_prompt(request: &SummaryRequest) -> String {
    let weather = serde_json::to_string(&request.weather).unwrap_or_default();

    format!(
        "Summarize the container status in 3-4 sentences, professional tone.\n\
         \n\
         Container: {}\n\
         Current position: ({:.4}, {:.4})\n\
         Predicted ETA (UTC): {}\n\
         Weather now: {}\n\
         \n\
         Include:\n\
         - Likely on-time/delay risk based on ETA and weather\n\
         - Any operational note (e.g., moderate winds)\n\
         - One actionable suggestion for operations\n",
        request.container_id,
        request.lat,
        request.lon,
        request.eta.to_rfc3339(),
        weather,
    )
}
