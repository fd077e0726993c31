use crate::{PhaseError, PhaseInfo, PhaseRequest, ServiceConfig, provider::usno::UsnoProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod usno;

#[async_trait]
pub trait PhaseProvider: Send + Sync + Debug {
    async fn get_phases(&self, request: &PhaseRequest) -> Result<PhaseInfo, PhaseError>;
}

/// Construct the provider described by the service config.
pub fn provider_from_config(config: &ServiceConfig) -> anyhow::Result<Box<dyn PhaseProvider>> {
    let provider = UsnoProvider::new(config.base_url.clone(), config.timeout, config.error_policy)?;
    Ok(Box::new(provider))
}
