use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod app;
mod keymap;
mod runtime;
mod terminal;
mod views;

use app::App;
use common::client::{HttpLogClient, LogSource};
use common::config::Settings;
use common::route::Route;
use common::telemetry;

/// Terminal dashboard for Spark job logs
#[derive(Debug, Parser)]
#[command(name = "spark-dashboard", version)]
struct Cli {
    /// Directory holding default.toml and local.toml
    #[arg(long, default_value = "config")]
    config: PathBuf,

    /// Log service base URL, overrides `api.base_url`
    #[arg(long, env = "SPARK_LOGS_URL")]
    base_url: Option<String>,

    /// View to open: `/` or `/job/{id}`
    #[arg(default_value = "/")]
    route: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::load_from_path(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let route: Route = cli.route.parse()?;

    // Logs go to a file; the terminal belongs to the UI
    telemetry::init_logging(
        &settings.observability.log_level,
        Path::new(&settings.observability.log_file),
    )?;
    tracing::info!(
        base_url = %settings.api.base_url,
        route = %route,
        "Configuration loaded"
    );

    if let Some(port) = settings.observability.metrics_port {
        telemetry::init_metrics(port)?;
        tracing::info!(port = port, "Metrics exporter initialized");
    }

    let client = HttpLogClient::new(&settings.api)?;
    let source: Arc<dyn LogSource> = Arc::new(client);

    let viewport = crossterm::terminal::size().context("Failed to read terminal size")?;
    let app = App::new(source, &settings.dashboard, route, viewport);

    tracing::info!("Starting dashboard");
    let result = runtime::run(app, settings.dashboard.refresh_interval()).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Dashboard exited with error");
    }

    tracing::info!("Dashboard stopped");
    result
}
