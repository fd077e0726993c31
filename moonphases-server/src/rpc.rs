//! JSON-over-HTTP transport for the GetPhases RPC.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use moonphases_core::{GetPhasesRequest, GetPhasesResponse, MoonPhasesService, PhaseError};
use serde::Serialize;
use tracing::Instrument;

use crate::logging::request_span;

pub const GET_PHASES_PATH: &str = "/moonphases.MoonPhases/GetPhases";

#[derive(Debug, Clone)]
struct RpcState {
    service: Arc<MoonPhasesService>,
    host: Arc<str>,
}

pub fn router(service: Arc<MoonPhasesService>, host: &str) -> Router {
    let state = RpcState { service, host: Arc::from(host) };

    Router::new()
        .route(GET_PHASES_PATH, post(get_phases))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_phases(
    State(state): State<RpcState>,
    body: Bytes,
) -> Result<Json<GetPhasesResponse>, RpcError> {
    let span = request_span(&state.host, "GetPhases");

    async move {
        // An empty body is the empty request message.
        let req = if body.iter().all(u8::is_ascii_whitespace) {
            GetPhasesRequest::default()
        } else {
            serde_json::from_slice(&body).map_err(|e| {
                tracing::warn!(error = %e, body_len = body.len(), "rejected GetPhases request body");
                RpcError::invalid_argument(e.to_string())
            })?
        };

        let response = state.service.get_phases(&req).await?;
        Ok(Json(response))
    }
    .instrument(span)
    .await
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    #[serde(skip)]
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl RpcError {
    fn invalid_argument(message: String) -> Self {
        Self { status: StatusCode::BAD_REQUEST, code: "invalid_argument", message }
    }
}

impl From<PhaseError> for RpcError {
    fn from(err: PhaseError) -> Self {
        let (status, code) = match &err {
            PhaseError::Transport { .. } => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            PhaseError::MalformedPayload(_) => (StatusCode::BAD_GATEWAY, "malformed_payload"),
            PhaseError::InsufficientData { .. } => (StatusCode::BAD_GATEWAY, "insufficient_data"),
            PhaseError::ProviderReported => (StatusCode::BAD_GATEWAY, "provider_error"),
        };

        Self { status, code, message: err.to_string() }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.status, Json(&self)).into_response()
    }
}
