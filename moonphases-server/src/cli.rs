use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use moonphases_core::{Config, GetPhasesRequest, MoonPhasesService, provider_from_config};
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::{
    logging::{self, LogFormat, init_logger, root_span},
    rpc,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "moonphases", version, about = "Moon phases RPC service")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the GetPhases RPC server.
    Serve(Overrides),

    /// Interactively set the city and listen address.
    Configure,

    /// Fetch today's phases once and print them.
    Show(Overrides),
}

/// Flags that override values from the config file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// [host]:port to listen on.
    #[arg(long)]
    pub addr: Option<String>,

    /// info, debug, warn, error.
    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// <City>, <State-Abbrev>
    #[arg(long)]
    pub city: Option<String>,

    /// Provider base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Outbound request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(addr) = &self.addr {
            cfg.addr = addr.clone();
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        if let Some(city) = &self.city {
            cfg.city = city.clone();
        }
        if let Some(base_url) = &self.base_url {
            cfg.provider.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            cfg.provider.timeout_secs = secs;
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut cfg = Config::load(self.config.as_deref())?;

        match self.command {
            Command::Serve(overrides) => {
                overrides.apply(&mut cfg);
                init_logger(&cfg.log_level, overrides.log_format);
                let host = logging::hostname()?;
                serve(cfg, &host).instrument(root_span(&host)).await
            }
            Command::Configure => configure(cfg, self.config),
            Command::Show(overrides) => {
                overrides.apply(&mut cfg);
                init_logger(&cfg.log_level, overrides.log_format);
                let host = logging::hostname()?;
                show(cfg).instrument(root_span(&host)).await
            }
        }
    }
}

fn build_service(cfg: &Config) -> anyhow::Result<MoonPhasesService> {
    let service_config = cfg.service_config()?;
    let provider = provider_from_config(&service_config)?;
    Ok(MoonPhasesService::new(service_config, Arc::from(provider)))
}

async fn serve(cfg: Config, host: &str) -> anyhow::Result<()> {
    let service = Arc::new(build_service(&cfg)?);

    let listener = TcpListener::bind(&cfg.addr)
        .await
        .with_context(|| format!("Failed to listen on {}", cfg.addr))?;

    tracing::info!(city = %service.config().city, "moon phases rpc server");
    tracing::info!(addr = %listener.local_addr()?, "starting to listen");

    axum::serve(listener, rpc::router(service, host))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("RPC server failed")?;

    tracing::info!("server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn show(cfg: Config) -> anyhow::Result<()> {
    let service = build_service(&cfg)?;
    let response = service.get_phases(&GetPhasesRequest::default()).await?;

    let info = response.phase_info.unwrap_or_default();
    println!("{}  (lat {}, lon {})", info.city, info.lat, info.lon);
    println!("Closest phase:  {}", info.closest_phase);
    println!("Rise:           {}", info.rise);
    println!("Upper transit:  {}", info.upper_transit);
    println!("Set:            {}", info.set);

    Ok(())
}

fn configure(mut cfg: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    cfg.city = inquire::Text::new("City (<City>, <State-Abbrev>):")
        .with_default(&cfg.city)
        .prompt()
        .context("Failed to read city")?;

    cfg.addr = inquire::Text::new("Listen address ([host]:port):")
        .with_default(&cfg.addr)
        .prompt()
        .context("Failed to read listen address")?;

    // Refuse to save something `serve` would reject.
    cfg.service_config()?;

    let written = cfg.save(path.as_deref())?;
    println!("Saved configuration to {}", written.display());

    Ok(())
}
