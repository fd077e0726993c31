use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::{
    config::ErrorPolicy,
    error::PhaseError,
    mapper,
    model::{PhaseInfo, PhaseRequest},
    query,
};

use super::PhaseProvider;

/// Client for the US Naval Observatory "one day" endpoint.
#[derive(Debug, Clone)]
pub struct UsnoProvider {
    base_url: Url,
    error_policy: ErrorPolicy,
    http: Client,
}

impl UsnoProvider {
    pub fn new(base_url: Url, timeout: Duration, error_policy: ErrorPolicy) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for USNO provider")?;

        Ok(Self { base_url, error_policy, http })
    }

    pub fn url_for(&self, request: &PhaseRequest) -> Url {
        query::build_url(&self.base_url, request.date, &request.city)
    }

    /// GET `url` and return the whole body, whatever the status code.
    pub async fn fetch_raw(&self, url: &Url) -> Result<Vec<u8>, PhaseError> {
        let transport = |source| PhaseError::Transport { url: url.to_string(), source };

        let res = self.http.get(url.clone()).send().await.map_err(transport)?;

        let status = res.status();
        if !status.is_success() {
            // USNO signals failures in-body; let the mapper decide.
            tracing::warn!(%url, %status, "USNO responded with non-success status");
        }

        let body = res.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl PhaseProvider for UsnoProvider {
    async fn get_phases(&self, request: &PhaseRequest) -> Result<PhaseInfo, PhaseError> {
        let url = self.url_for(request);
        tracing::debug!(%url, "Encoded USNO URL");

        let result = match self.fetch_raw(&url).await {
            Ok(body) => mapper::map_response(&body, self.error_policy),
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            tracing::error!(%url, stage = err.stage(), error = %err, "GetPhases failed");
        }

        result
    }
}
