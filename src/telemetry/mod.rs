//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{init_metrics, increment, record_latency, CounterMetric, LatencyMetric};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        init_metrics(port)?;
    }

    Ok(())
}
