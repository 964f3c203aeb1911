//! Metrics setup and update for query execution.

use prometheus::{Histogram, HistogramOpts, HistogramTimer, IntCounter, IntCounterVec, Opts};

#[derive(Clone)]
pub struct Metrics {
    query_total: IntCounter,
    query_error_total: IntCounterVec,
    query_duration_seconds: Histogram,
    health_check_total: IntCounter,
}

impl Metrics {
    /// Set up the counters and histograms and register them with the provided
    /// Prometheus registry.
    pub fn initialize(
        metrics_registry: &mut prometheus::Registry,
    ) -> Result<Self, prometheus::Error> {
        let query_total = add_int_counter_metric(
            metrics_registry,
            "feldera_datasource_query_total",
            "Total successful queries.",
        )?;

        let query_error_total = IntCounterVec::new(
            Opts::new(
                "feldera_datasource_query_error_total",
                "Total failed queries, by kind of failure.",
            ),
            &["kind"],
        )?;
        metrics_registry.register(Box::new(query_error_total.clone()))?;

        let query_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "feldera_datasource_query_duration_seconds",
            "Time spent executing queries against a pipeline, in seconds.",
        ))?;
        metrics_registry.register(Box::new(query_duration_seconds.clone()))?;

        let health_check_total = add_int_counter_metric(
            metrics_registry,
            "feldera_datasource_health_check_total",
            "Total health checks.",
        )?;

        Ok(Self {
            query_total,
            query_error_total,
            query_duration_seconds,
            health_check_total,
        })
    }

    pub fn time_query(&self) -> HistogramTimer {
        self.query_duration_seconds.start_timer()
    }

    pub fn record_query_success(&self) {
        self.query_total.inc();
    }

    pub fn record_query_error(&self, kind: &str) {
        self.query_error_total.with_label_values(&[kind]).inc();
    }

    pub fn record_health_check(&self) {
        self.health_check_total.inc();
    }

    pub fn query_total(&self) -> u64 {
        self.query_total.get()
    }

    pub fn query_error_total(&self, kind: &str) -> u64 {
        self.query_error_total.with_label_values(&[kind]).get()
    }

    pub fn health_check_total(&self) -> u64 {
        self.health_check_total.get()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("query_total", &self.query_total.get())
            .field("health_check_total", &self.health_check_total.get())
            .finish_non_exhaustive()
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<IntCounter, prometheus::Error> {
    let int_counter = IntCounter::with_opts(Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}
