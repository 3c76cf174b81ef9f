pub mod custom;
pub mod external;
pub mod synthetic;

pub use custom::CustomProvider;
pub use external::ExternalProvider;
pub use synthetic::SyntheticProvider;

use crate::data::PositionFix;
use crate::error::Result;
use crate::utils::clock::Clock;
use crate::utils::config::ProviderConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Identifier used when the caller passes an empty one
pub const PLACEHOLDER_ID: &str = "MSCU1234567";

/// Resolves a container or vessel identifier to its current position
#[async_trait]
pub trait PositionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn resolve(&self, identifier: &str) -> Result<PositionFix>;
}

/// Backend selected by the `provider.kind` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Synthetic,
    External,
    Custom,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Synthetic => "mock",
            ProviderKind::External => "aishub",
            ProviderKind::Custom => "custom",
        }
    }
}

impl From<&str> for ProviderKind {
    /// Never fails: unknown selectors mean synthetic
    fn from(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "mock" | "synthetic" => ProviderKind::Synthetic,
            "aishub" | "external" => ProviderKind::External,
            "custom" => ProviderKind::Custom,
            other => {
                debug!(selector = other, "Unrecognized provider selector, using mock");
                ProviderKind::Synthetic
            }
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the provider named by the configuration
///
/// Fails with a configuration error when the external provider is selected
/// without an endpoint and API key.
pub fn build_provider(
    config: &ProviderConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn PositionProvider>> {
    let kind = ProviderKind::from(config.kind.as_str());
    info!("Position provider: {}", kind);

    let provider: Arc<dyn PositionProvider> = match kind {
        ProviderKind::Synthetic => Arc::new(SyntheticProvider::new(clock)),
        ProviderKind::Custom => Arc::new(CustomProvider::new(clock)),
        ProviderKind::External => Arc::new(ExternalProvider::from_config(
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
            Duration::from_secs(config.timeout_secs),
            clock,
        )?),
    };

    Ok(provider)
}

/// Uppercased identifier, or the placeholder when empty
///
/// Whitespace is kept as given since it is part of the hash seed.
pub fn normalize_identifier(identifier: &str) -> String {
    if identifier.is_empty() {
        PLACEHOLDER_ID.to_string()
    } else {
        identifier.to_uppercase()
    }
}

/// First four characters, used to synthesize vessel names
pub(crate) fn name_stem(identifier: &str) -> String {
    identifier.chars().take(4).collect()
}
