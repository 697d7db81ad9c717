//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Whole batch, snapshot fetch included
    Batch,
    /// Single market order round trip
    OrderSubmission,
    /// Fallback price lookup
    FallbackPrice,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Orders acknowledged by the exchange
    OrdersSubmitted,
    /// Orders that failed during submission
    OrdersFailed,
    /// Items rejected by trading filters
    ItemsRejected,
    /// Items skipped before validation (zero quantity or quote asset)
    ItemsSkipped,
    /// Fallback lookups that yielded no price
    FallbackMisses,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::Batch => "minance_batch_duration_seconds",
            LatencyMetric::OrderSubmission => "minance_order_submission_seconds",
            LatencyMetric::FallbackPrice => "minance_fallback_price_seconds",
        }
    }
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::OrdersSubmitted => "minance_orders_submitted_total",
            CounterMetric::OrdersFailed => "minance_orders_failed_total",
            CounterMetric::ItemsRejected => "minance_items_rejected_total",
            CounterMetric::ItemsSkipped => "minance_items_skipped_total",
            CounterMetric::FallbackMisses => "minance_fallback_misses_total",
        }
    }
}

/// Install the Prometheus recorder and its scrape endpoint
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to init metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    metrics::histogram!(metric.name()).record(duration.as_secs_f64());
}

/// Increment a counter, labelled with the trade side where one applies
pub fn increment(metric: CounterMetric, side: Option<&'static str>) {
    match side {
        Some(side) => metrics::counter!(metric.name(), "side" => side).increment(1),
        None => metrics::counter!(metric.name()).increment(1),
    }
}
