use anyhow::{Context, anyhow};
use clap::ValueEnum;
use tracing::{Span, Subscriber, level_filters::LevelFilter};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::MakeWriter,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub const SERVICE: &str = "moonphases";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

/// Map a `--log-level` value to a filter; unknown values mean `info`.
pub fn level_filter(level: &str) -> LevelFilter {
    match level {
        "error" => LevelFilter::ERROR,
        "warn" => LevelFilter::WARN,
        "debug" => LevelFilter::DEBUG,
        _ => LevelFilter::INFO,
    }
}

/// Name of this machine, attached to every log line.
pub fn hostname() -> anyhow::Result<String> {
    let host = ::hostname::get().context("cannot get hostname")?;
    host.into_string()
        .map_err(|raw| anyhow!("cannot get hostname: {raw:?} is not valid UTF-8"))
}

/// Root span for process-level lines such as startup and shutdown.
pub fn root_span(host: &str) -> Span {
    tracing::info_span!("moonphases", service = SERVICE, host = %host)
}

/// Span around one inbound RPC. Connection tasks do not inherit the root
/// span, so the identifying fields are repeated here.
pub fn request_span(host: &str, method: &'static str) -> Span {
    tracing::info_span!("rpc", service = SERVICE, host = %host, facility = "rpc", method)
}

/// JSON lines with the current span's fields under `span` and event fields
/// at the top level.
pub fn json_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .flatten_event(true)
        .with_writer(make_writer)
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over `level`.
pub fn init_logger(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter(level).into()));

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(json_layer(std::io::stdout)).init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init(),
    }
}
