use crate::data::PositionFix;
use crate::error::Result;
use crate::provider::{PositionProvider, ProviderKind, SyntheticProvider};
use crate::utils::clock::Clock;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Slot for an in-house vessel data source (MarineTraffic, VesselFinder, ...)
///
/// Until one is wired in, positions come from the synthetic generator.
pub struct CustomProvider {
    inner: SyntheticProvider,
}

impl CustomProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: SyntheticProvider::new(clock),
        }
    }
}

#[async_trait]
impl PositionProvider for CustomProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Custom
    }

    async fn resolve(&self, identifier: &str) -> Result<PositionFix> {
        debug!(identifier, "Custom provider delegating to synthetic positions");
        self.inner.resolve(identifier).await
    }
}
