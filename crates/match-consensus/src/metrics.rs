//! Prometheus metrics for the consensus aggregation subsystem
//!
//! Enable with the `metrics` feature:
//! ```toml
//! match-consensus = { path = "...", features = ["metrics"] }
//! ```
//!
//! Metrics exported:
//!
//! - `consensus_submissions_total` - Counter of accepted submissions
//! - `consensus_submissions_rejected_total` - Counter of rejected submissions (by reason)
//! - `consensus_evaluations_total` - Counter of evaluations (by outcome)
//! - `consensus_sessions_finalized_total` - Counter of finalized sessions
//! - `consensus_sessions_open` - Gauge of currently open sessions

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_gauge, register_int_counter, CounterVec, Gauge, IntCounter,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total accepted result submissions
    pub static ref SUBMISSIONS: IntCounter = register_int_counter!(
        "consensus_submissions_total",
        "Total number of accepted result submissions"
    )
    .expect("Failed to create SUBMISSIONS metric");

    /// Total rejected submissions, labeled by reason
    pub static ref SUBMISSIONS_REJECTED: CounterVec = register_counter_vec!(
        "consensus_submissions_rejected_total",
        "Total number of rejected result submissions",
        &["reason"]
    )
    .expect("Failed to create SUBMISSIONS_REJECTED metric");

    /// Total consensus evaluations, labeled by outcome
    pub static ref EVALUATIONS: CounterVec = register_counter_vec!(
        "consensus_evaluations_total",
        "Total number of consensus evaluations",
        &["outcome"]
    )
    .expect("Failed to create EVALUATIONS metric");

    /// Total finalized sessions
    pub static ref SESSIONS_FINALIZED: IntCounter = register_int_counter!(
        "consensus_sessions_finalized_total",
        "Total number of finalized consensus sessions"
    )
    .expect("Failed to create SESSIONS_FINALIZED metric");

    /// Currently open sessions
    pub static ref SESSIONS_OPEN: Gauge = register_gauge!(
        "consensus_sessions_open",
        "Number of currently open consensus sessions"
    )
    .expect("Failed to create SESSIONS_OPEN metric");
}

/// Record an accepted submission
#[cfg(feature = "metrics")]
pub fn record_submission() {
    SUBMISSIONS.inc();
}

/// Record a rejected submission with reason
#[cfg(feature = "metrics")]
pub fn record_submission_rejected(reason: &str) {
    SUBMISSIONS_REJECTED.with_label_values(&[reason]).inc();
}

/// Record an evaluation with its outcome
#[cfg(feature = "metrics")]
pub fn record_evaluation(agreed: bool) {
    let outcome = if agreed { "agreed" } else { "no_consensus" };
    EVALUATIONS.with_label_values(&[outcome]).inc();
}

/// Record a finalized session
#[cfg(feature = "metrics")]
pub fn record_session_finalized() {
    SESSIONS_FINALIZED.inc();
}

/// Update the open-sessions gauge
#[cfg(feature = "metrics")]
pub fn set_open_sessions(count: usize) {
    SESSIONS_OPEN.set(count as f64);
}

// No-op implementations when the metrics feature is disabled.

#[cfg(not(feature = "metrics"))]
pub fn record_submission() {}

#[cfg(not(feature = "metrics"))]
pub fn record_submission_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_evaluation(_agreed: bool) {}

#[cfg(not(feature = "metrics"))]
pub fn record_session_finalized() {}

#[cfg(not(feature = "metrics"))]
pub fn set_open_sessions(_count: usize) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_noop_when_disabled() {
        // These should compile and run without panic even without the
        // metrics feature.
        record_submission();
        record_submission_rejected("decode");
        record_evaluation(true);
        record_session_finalized();
        set_open_sessions(3);
    }
}
