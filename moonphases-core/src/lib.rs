//! Core library for the moon phases service.
//!
//! This crate defines:
//! - Configuration loading and validation
//! - The request pipeline: query builder, USNO fetcher, response mapper
//! - Shared domain models (provider document, RPC messages)
//!
//! It is used by `moonphases-server`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod provider;
pub mod query;
pub mod service;

pub use config::{Config, ErrorPolicy, ProviderConfig, ServiceConfig};
pub use error::PhaseError;
pub use model::{
    ClosestPhase, ExternalPhaseDocument, GetPhasesRequest, GetPhasesResponse, MoonEvents,
    PhaseInfo, PhaseRequest, Phenomenon,
};
pub use provider::{PhaseProvider, provider_from_config};
pub use service::MoonPhasesService;
