use crate::data::{Summary, SummaryRequest};
use crate::error::{check_status, Result, TrackingError, UpstreamError};
use crate::summary::{build_prompt, SummaryGenerator, TemplateSummarizer};
use crate::utils::config::SummaryConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

pub const PROVIDER_NAME: &str = "openai";

const SYSTEM_PROMPT: &str = "You are a logistics operations assistant.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions summarizer
///
/// Any failure of the completion call degrades to the template summary.
pub struct OpenAiSummarizer {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
}

impl OpenAiSummarizer {
    pub fn new(config: &SummaryConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TrackingError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// One completion call, no fallback
    pub async fn complete(&self, request: &SummaryRequest) -> Result<Summary> {
        self.call(request).await.map_err(TrackingError::Summary)
    }

    async fn call(&self, request: &SummaryRequest) -> std::result::Result<Summary, UpstreamError> {
        let prompt = build_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let text = check_status(response).await?.text().await?;
        let completion: ChatResponse =
            serde_json::from_str(&text).map_err(|e| UpstreamError::Decode(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| UpstreamError::Decode("completion has no content".to_string()))?;

        Ok(Summary {
            summary: content,
            provider: PROVIDER_NAME.to_string(),
        })
    }
}

#[async_trait]
impl SummaryGenerator for OpenAiSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<Summary> {
        info!("Requesting summary for {} from {}", request.container_id, self.model);

        match self.complete(request).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                warn!("Falling back to template summary: {}", e);
                Ok(TemplateSummarizer::render(request))
            }
        }
    }
}
