//! Prometheus metrics for the verification pipeline.
//!
//! The [`PipelineMetrics`] struct owns a dedicated [`Registry`] that the
//! HTTP `/metrics` endpoint encodes into the Prometheus text exposition
//! format.

use prometheus::{register_int_counter_with_registry, IntCounter, Opts, Registry};

/// Central collection of pipeline-level Prometheus metrics.
pub struct PipelineMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    /// Total submissions received (after rate limiting).
    pub submissions_total: IntCounter,
    /// Submissions that completed with a persisted facility.
    pub submissions_done: IntCounter,
    /// Submissions rejected by content or fraud checks.
    pub submissions_rejected: IntCounter,
    /// Submissions aborted by an external service failure.
    pub submissions_failed: IntCounter,
    /// Submissions denied by the rate limiter before classification.
    pub rate_limited_total: IntCounter,
    /// Completed runs where both payment paths failed (null transaction).
    pub payment_failures_total: IntCounter,
}

impl PipelineMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let submissions_total = register_int_counter_with_registry!(
            Opts::new("kerb_submissions_total", "Total submissions processed"),
            registry
        )
        .expect("failed to register submissions_total counter");

        let submissions_done = register_int_counter_with_registry!(
            Opts::new("kerb_submissions_done_total", "Submissions completed"),
            registry
        )
        .expect("failed to register submissions_done counter");

        let submissions_rejected = register_int_counter_with_registry!(
            Opts::new(
                "kerb_submissions_rejected_total",
                "Submissions rejected by content or fraud checks"
            ),
            registry
        )
        .expect("failed to register submissions_rejected counter");

        let submissions_failed = register_int_counter_with_registry!(
            Opts::new(
                "kerb_submissions_failed_total",
                "Submissions aborted by external service failures"
            ),
            registry
        )
        .expect("failed to register submissions_failed counter");

        let rate_limited_total = register_int_counter_with_registry!(
            Opts::new(
                "kerb_rate_limited_total",
                "Submissions denied by the rate limiter"
            ),
            registry
        )
        .expect("failed to register rate_limited counter");

        let payment_failures_total = register_int_counter_with_registry!(
            Opts::new(
                "kerb_payment_failures_total",
                "Completed runs with both payment paths failed"
            ),
            registry
        )
        .expect("failed to register payment_failures counter");

        Self {
            registry,
            submissions_total,
            submissions_done,
            submissions_rejected,
            submissions_failed,
            rate_limited_total,
            payment_failures_total,
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}
