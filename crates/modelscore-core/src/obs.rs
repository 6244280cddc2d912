//! Structured lifecycle events for subject evaluation.
//!
//! This module provides:
//! - a subject-scoped span, attached to every task of one evaluation
//! - emission functions for start, per-metric outcome, finish and skip
//!
//! Every event carries an `event = "..."` field so JSON log consumers can
//! filter on it.

use tracing::{info, warn, Span};

/// Span tagging all events of one subject's evaluation with its name.
///
/// Attach it to futures with [`tracing::Instrument`]; an entered guard
/// cannot be held across the orchestrator's awaits.
pub fn subject_span(subject: &str) -> Span {
    tracing::info_span!("modelscore.subject", subject = %subject)
}

pub fn emit_evaluation_started(subject: &str, metric_count: usize) {
    info!(
        event = "evaluation.started",
        subject = %subject,
        metric_count = metric_count,
    );
}

pub fn emit_metric_finished(metric: &str, score: f64, latency_ms: u64) {
    info!(
        event = "metric.finished",
        metric = %metric,
        score = score,
        latency_ms = latency_ms,
    );
}

/// Warning level: the metric was forced to its zero-equivalent.
pub fn emit_metric_failed(metric: &str, error: &dyn std::fmt::Display, latency_ms: u64) {
    warn!(
        event = "metric.failed",
        metric = %metric,
        error = %error,
        latency_ms = latency_ms,
    );
}

pub fn emit_evaluation_finished(subject: &str, net_score: f64, latency_ms: u64, failures: usize) {
    info!(
        event = "evaluation.finished",
        subject = %subject,
        net_score = net_score,
        latency_ms = latency_ms,
        failures = failures,
    );
}

pub fn emit_subject_skipped(line_no: usize, reason: &str) {
    warn!(event = "subject.skipped", line = line_no, reason = %reason);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_span_create() {
        let span = subject_span("bert-base-uncased");
        let _guard = span.enter();
        emit_metric_finished("license", 1.0, 3);
    }
}
