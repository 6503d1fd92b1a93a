//! Binding metrics tracking using OpenTelemetry.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Metrics collector for dispatch and discovery.
///
/// # Examples
///
/// ```rust,no_run
/// use freeview::metrics::BindingMetrics;
/// use opentelemetry::global;
///
/// let meter = global::meter("freeview");
/// let metrics = BindingMetrics::new(meter);
///
/// metrics.record_dispatch(3, 0);
/// metrics.record_discovery(2);
/// ```
#[derive(Clone)]
pub struct BindingMetrics {
    notifications_delivered: Counter<u64>,
    listener_failures: Counter<u64>,
    discovery_runs: Counter<u64>,
    discovery_failures: Counter<u64>,
    discovered_instances: Histogram<u64>,
}

impl BindingMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let notifications_delivered = meter
            .u64_counter("freeview.dispatch.delivered")
            .with_description("Notifications delivered to listeners")
            .build();

        let listener_failures = meter
            .u64_counter("freeview.dispatch.listener_failures")
            .with_description("Listener invocations that panicked")
            .build();

        let discovery_runs = meter
            .u64_counter("freeview.discovery.runs")
            .with_description("Capability discovery calls")
            .build();

        let discovery_failures = meter
            .u64_counter("freeview.discovery.failures")
            .with_description("Capability discovery calls that returned an error")
            .build();

        let discovered_instances = meter
            .u64_histogram("freeview.discovery.instances")
            .with_description("Instances created per successful discovery")
            .build();

        Self {
            notifications_delivered,
            listener_failures,
            discovery_runs,
            discovery_failures,
            discovered_instances,
        }
    }

    /// Record the outcome of one notification dispatch.
    pub fn record_dispatch(&self, delivered: usize, failed: usize) {
        self.notifications_delivered.add(delivered as u64, &[]);
        if failed > 0 {
            self.listener_failures.add(failed as u64, &[]);
        }
    }

    /// Record a successful discovery that created `instances` objects.
    pub fn record_discovery(&self, instances: usize) {
        self.discovery_runs.add(1, &[]);
        self.discovered_instances.record(instances as u64, &[]);
    }

    /// Record a failed discovery.
    pub fn record_discovery_failure(&self) {
        self.discovery_runs.add(1, &[]);
        self.discovery_failures.add(1, &[]);
    }
}
