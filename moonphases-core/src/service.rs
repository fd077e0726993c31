use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::{
    PhaseError, PhaseProvider, ServiceConfig,
    model::{GetPhasesRequest, GetPhasesResponse, PhaseRequest},
};

/// Handler behind the GetPhases RPC.
#[derive(Debug, Clone)]
pub struct MoonPhasesService {
    config: Arc<ServiceConfig>,
    provider: Arc<dyn PhaseProvider>,
}

impl MoonPhasesService {
    pub fn new(config: ServiceConfig, provider: Arc<dyn PhaseProvider>) -> Self {
        Self { config: Arc::new(config), provider }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Moon phase info for the configured city, today in local time.
    pub async fn get_phases(&self, req: &GetPhasesRequest) -> Result<GetPhasesResponse, PhaseError> {
        self.get_phases_on(req, Local::now().date_naive()).await
    }

    pub async fn get_phases_on(
        &self,
        _req: &GetPhasesRequest,
        date: NaiveDate,
    ) -> Result<GetPhasesResponse, PhaseError> {
        tracing::info!(city = %self.config.city, %date, "GET");

        let request = PhaseRequest { city: self.config.city.clone(), date };
        let info = self.provider.get_phases(&request).await?;

        Ok(GetPhasesResponse { phase_info: Some(info) })
    }
}
