//! sensu-slo
//!
//! Sensu handler reporting the age of a check result to statsite. The
//! event is read from stdin, as Sensu pipes it to handlers.
//!
//! # Usage
//!
//! ```bash
//! sensu-slo < event.json
//! sensu-slo --event event.json --statsite-port 8126
//! RUST_LOG=debug sensu-slo --config /etc/sensu/conf.d < event.json
//! ```

#![deny(unsafe_code)]

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shared::config::{SettingsLoader, SloSettings, CONFIG_FILES_ENV};
use shared::environment::{EnvironmentDimensions, DEFAULT_ENV_DIR};
use shared::models::Event;
use shared::reporter::LatencyReporter;
use shared::sink::UdpSink;
use shared::validator::Validate;
use tracing_subscriber::EnvFilter;

/// sensu-slo - Report check result age to statsite
#[derive(Parser)]
#[command(name = "sensu-slo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read the event from a file instead of stdin
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// Settings file or directory; may be repeated
    #[arg(short, long = "config", env = CONFIG_FILES_ENV, value_delimiter = ':')]
    config: Vec<PathBuf>,

    /// Override the `metric_name` setting
    #[arg(long, env = "SENSU_SLO_METRIC_NAME")]
    metric_name: Option<String>,

    /// Override the `statsite_host` setting
    #[arg(long, env = "SENSU_SLO_STATSITE_HOST")]
    statsite_host: Option<String>,

    /// Override the `statsite_port` setting
    #[arg(long, env = "SENSU_SLO_STATSITE_PORT")]
    statsite_port: Option<u16>,

    /// Directory holding the default dimension files
    #[arg(long, env = "SENSU_SLO_ENV_DIR", default_value = DEFAULT_ENV_DIR)]
    env_dir: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let settings = resolve_settings(&cli);

    let event = match read_event(cli.event.as_deref()) {
        Ok(event) => event,
        Err(error) => {
            tracing::error!("{error:#}");
            return Ok(());
        }
    };

    let sink = UdpSink::from_settings(&settings);
    let reporter = LatencyReporter::new(settings, EnvironmentDimensions::new(&cli.env_dir), sink);

    if let Some(bytes) = reporter.handle(&event).bytes_sent() {
        println!("{bytes} bytes sent to statsite");
    }

    Ok(())
}

/// Logs go to stderr; stdout is reserved for the result line.
fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Loads settings files, then applies command-line and environment
/// overrides. Unusable files fall back to the defaults; an invalid
/// override falls back to the loaded settings.
fn resolve_settings(cli: &Cli) -> SloSettings {
    let loader = if cli.config.is_empty() {
        SettingsLoader::default()
    } else {
        SettingsLoader::new(cli.config.iter().cloned())
    };

    let loaded = loader.load_slo_settings().unwrap_or_else(|error| {
        tracing::error!(error = %error, "Failed to load settings, using defaults");
        SloSettings::default()
    });

    let mut settings = loaded.clone();
    if let Some(metric_name) = &cli.metric_name {
        settings = settings.with_metric_name(metric_name.as_str());
    }
    if let Some(host) = &cli.statsite_host {
        settings = settings.with_statsite_host(host.as_str());
    }
    if let Some(port) = cli.statsite_port {
        settings = settings.with_statsite_port(port);
    }

    let settings = match settings.validate() {
        Ok(()) => settings,
        Err(error) => {
            tracing::error!(error = %error, "Invalid settings override, ignoring overrides");
            loaded
        }
    };

    tracing::debug!(
        destination = %settings.destination(),
        metric_name = %settings.metric_name,
        "Resolved settings"
    );
    settings
}

fn read_event(path: Option<&Path>) -> Result<Event> {
    let input = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("error reading event from {}", path.display()))?,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("error reading event from stdin")?;
            input
        }
    };

    Ok(Event::from_json(&input)?)
}
