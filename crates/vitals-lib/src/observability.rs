//! Prometheus metrics for the vitals service

use prometheus::{register_histogram, register_int_gauge, Histogram, IntGauge};
use std::sync::OnceLock;

use crate::health::ServiceStatus;

/// Histogram buckets for health check latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    health_check_latency_seconds: Histogram,
    health_checks_total: IntGauge,
    health_checks_down_total: IntGauge,
    users_registered: IntGauge,
    user_mutations_total: IntGauge,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            health_check_latency_seconds: register_histogram!(
                "vitals_health_check_latency_seconds",
                "Time spent gathering host metrics for a health report",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register health_check_latency_seconds"),

            health_checks_total: register_int_gauge!(
                "vitals_health_checks_total",
                "Total number of health reports produced"
            )
            .expect("Failed to register health_checks_total"),

            health_checks_down_total: register_int_gauge!(
                "vitals_health_checks_down_total",
                "Total number of health reports with a DOWN verdict"
            )
            .expect("Failed to register health_checks_down_total"),

            users_registered: register_int_gauge!(
                "vitals_users_registered",
                "Number of user records currently in the registry"
            )
            .expect("Failed to register users_registered"),

            user_mutations_total: register_int_gauge!(
                "vitals_user_mutations_total",
                "Total number of create/update/delete operations applied"
            )
            .expect("Failed to register user_mutations_total"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    // This is just a marker - we use the global instance
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record the latency of one health report
    pub fn observe_health_check_latency(&self, duration_secs: f64) {
        self.inner()
            .health_check_latency_seconds
            .observe(duration_secs);
    }

    /// Count a produced health report by its verdict
    pub fn inc_health_checks(&self, status: ServiceStatus) {
        self.inner().health_checks_total.inc();
        if !status.is_up() {
            self.inner().health_checks_down_total.inc();
        }
    }

    /// Update the registered-users gauge
    pub fn set_users_registered(&self, count: i64) {
        self.inner().users_registered.set(count);
    }

    /// Count a registry mutation (create, update, or delete)
    pub fn inc_user_mutations(&self) {
        self.inner().user_mutations_total.inc();
    }
}
