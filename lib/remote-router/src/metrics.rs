//! Prometheus metrics for routed and broadcast plugin calls

use prometheus::{CounterVec, Encoder, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;

/// Remote operation a routed call maps to, used as a metric label
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    LoadPlugin,
    ActivatePlugin,
    InvokeMethod,
    InvokeLocalMethod,
    DefineExports,
    DefinePackage,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LoadPlugin => "load_plugin",
            Operation::ActivatePlugin => "activate_plugin",
            Operation::InvokeMethod => "invoke_method",
            Operation::InvokeLocalMethod => "invoke_local_method",
            Operation::DefineExports => "define_exports",
            Operation::DefinePackage => "define_package",
        }
    }
}

/// Outcome label for a single remote call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    RemoteError,
    EndpointMissing,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::RemoteError => "remote_error",
            Outcome::EndpointMissing => "endpoint_missing",
        }
    }
}

/// Prometheus metrics collector for plugin routing
#[derive(Clone)]
pub struct RoutingMetrics {
    /// Calls forwarded to a single endpoint
    pub forwarded_calls_total: CounterVec,
    /// Time spent waiting on forwarded calls
    pub forward_duration_seconds: HistogramVec,
    /// Per-endpoint broadcast deliveries
    pub broadcast_deliveries_total: CounterVec,
    /// Calls for plugins with no bound endpoint
    pub unrouted_calls_total: CounterVec,
    /// Prometheus registry for metrics
    pub registry: Arc<Registry>,
}

impl RoutingMetrics {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let forwarded_calls_total = CounterVec::new(
            Opts::new(
                "plugin_router_forwarded_calls_total",
                "Plugin calls forwarded to their owning endpoint",
            ),
            &["operation", "outcome"],
        )?;

        let forward_duration_seconds = HistogramVec::new(
            Opts::new(
                "plugin_router_forward_duration_seconds",
                "Latency of forwarded plugin calls in seconds",
            )
            .into(),
            &["operation"],
        )?;

        let broadcast_deliveries_total = CounterVec::new(
            Opts::new(
                "plugin_router_broadcast_deliveries_total",
                "Plugin metadata deliveries to non-owning endpoints",
            ),
            &["operation", "outcome"],
        )?;

        let unrouted_calls_total = CounterVec::new(
            Opts::new(
                "plugin_router_unrouted_calls_total",
                "Plugin calls with no bound endpoint",
            ),
            &["operation"],
        )?;

        registry.register(Box::new(forwarded_calls_total.clone()))?;
        registry.register(Box::new(forward_duration_seconds.clone()))?;
        registry.register(Box::new(broadcast_deliveries_total.clone()))?;
        registry.register(Box::new(unrouted_calls_total.clone()))?;

        Ok(Self {
            forwarded_calls_total,
            forward_duration_seconds,
            broadcast_deliveries_total,
            unrouted_calls_total,
            registry,
        })
    }

    pub fn record_forward(&self, operation: Operation, outcome: Outcome, elapsed: Duration) {
        self.forwarded_calls_total
            .with_label_values(&[operation.as_str(), outcome.as_str()])
            .inc();
        self.forward_duration_seconds
            .with_label_values(&[operation.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Count a call that never reached a remote. No latency is observed.
    pub fn record_unreachable(&self, operation: Operation) {
        self.forwarded_calls_total
            .with_label_values(&[operation.as_str(), Outcome::EndpointMissing.as_str()])
            .inc();
    }

    pub fn record_delivery(&self, operation: Operation, outcome: Outcome) {
        self.broadcast_deliveries_total
            .with_label_values(&[operation.as_str(), outcome.as_str()])
            .inc();
    }

    pub fn record_unrouted(&self, operation: Operation) {
        self.unrouted_calls_total
            .with_label_values(&[operation.as_str()])
            .inc();
    }

    /// Gather all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for RoutingMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create default RoutingMetrics")
    }
}
