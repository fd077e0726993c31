use thiserror::Error;

use crate::model::Phenomenon;

/// Failure of a single GetPhases request.
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("Failed to fetch moon phase data from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse moon phase data: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("missing moondata: {moon_data:?}")]
    InsufficientData { moon_data: Vec<Phenomenon> },

    #[error("Provider reported an error for this query")]
    ProviderReported,
}

impl PhaseError {
    /// Pipeline stage the error was raised in, used as a log field.
    pub fn stage(&self) -> &'static str {
        match self {
            PhaseError::Transport { .. } => "fetch",
            PhaseError::MalformedPayload(_) => "parse",
            PhaseError::InsufficientData { .. } | PhaseError::ProviderReported => "validate",
        }
    }
}
