use thiserror::Error;

/// Failure talking to an upstream HTTP service
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum TrackingError {
    /// Settings required by the selected backend are missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("position lookup failed: {0}")]
    Provider(#[source] UpstreamError),
    #[error("weather lookup failed: {0}")]
    Weather(#[source] UpstreamError),
    #[error("summary generation failed: {0}")]
    Summary(#[source] UpstreamError),
}

impl TrackingError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, TrackingError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, TrackingError>;

/// Turn a non-2xx response into an [`UpstreamError::Status`], passing successes through
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> std::result::Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        status: status.as_u16(),
        body,
    })
}
