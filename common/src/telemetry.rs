// Telemetry module for structured logging and metrics

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::errors::FetchError;

/// Initialize structured logging with JSON formatting.
///
/// Output goes to `log_file`, never to the terminal the dashboard draws on.
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_logging(log_level: &str, log_file: &Path) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_file.display(), e))?;

    let json_layer = fmt::layer()
        .json()
        .with_writer(Mutex::new(file))
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(
        log_level = log_level,
        log_file = %log_file.display(),
        "Structured logging initialized with JSON formatting"
    );

    Ok(())
}

/// Initialize Prometheus metrics exporter
///
/// Registers:
/// - log_fetch_total: Counter of log service requests by endpoint
/// - log_fetch_failed_total: Counter of failed requests by endpoint and kind
/// - log_fetch_discarded_total: Counter of responses dropped as superseded
/// - log_fetch_duration_seconds: Histogram of request latency
pub fn init_metrics(metrics_port: u16) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", metrics_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid metrics port: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    describe_counter!("log_fetch_total", "Total number of log service requests");
    describe_counter!(
        "log_fetch_failed_total",
        "Total number of failed log service requests"
    );
    describe_counter!(
        "log_fetch_discarded_total",
        "Responses discarded because a newer request was issued"
    );
    describe_histogram!(
        "log_fetch_duration_seconds",
        "Duration of log service requests in seconds"
    );

    tracing::info!(
        metrics_port = metrics_port,
        metrics_endpoint = format!("http://0.0.0.0:{}/metrics", metrics_port),
        "Prometheus metrics exporter initialized"
    );

    Ok(())
}

/// Record one finished log service request
#[inline]
pub fn record_request(endpoint: &'static str, elapsed: Duration, error: Option<&FetchError>) {
    counter!("log_fetch_total", "endpoint" => endpoint).increment(1);
    histogram!("log_fetch_duration_seconds", "endpoint" => endpoint).record(elapsed.as_secs_f64());

    if let Some(err) = error {
        counter!(
            "log_fetch_failed_total",
            "endpoint" => endpoint,
            "kind" => err.kind()
        )
        .increment(1);
    }
}

/// Record a response dropped because a newer request superseded it
#[inline]
pub fn record_discarded() {
    counter!("log_fetch_discarded_total").increment(1);
}
