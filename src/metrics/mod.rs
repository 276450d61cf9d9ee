// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - RPC request counts, labelled by rpc and outcome
// - RPC handling latency
// - Ticket volume (booked / cancelled)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// on the metrics HTTP server.
// ============================================================================

/// Central metrics registry for the service.
pub struct Metrics {
    registry: Registry,

    /// RPC requests by rpc name and outcome
    /// (ok / timeout / the error taxonomy).
    pub requests_total: IntCounterVec,
    /// RPC handling duration by rpc name.
    pub request_duration: HistogramVec,
    /// Tickets successfully booked.
    pub tickets_booked: IntCounter,
    /// Tickets successfully cancelled.
    pub tickets_cancelled: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("booking_requests_total", "Total RPC requests by outcome"),
            &["rpc", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "booking_request_duration_seconds",
                "RPC handling duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["rpc"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        let tickets_booked = IntCounter::new(
            "tickets_booked_total",
            "Total tickets successfully booked",
        )?;
        registry.register(Box::new(tickets_booked.clone()))?;

        let tickets_cancelled = IntCounter::new(
            "tickets_cancelled_total",
            "Total tickets successfully cancelled",
        )?;
        registry.register(Box::new(tickets_cancelled.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
            tickets_booked,
            tickets_cancelled,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
