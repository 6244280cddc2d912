//! Failure-contained execution of a single metric unit.
//!
//! [`MetricRunner::run`] times `fetch` + `score` and always returns a
//! well-formed [`MetricResult`]. Errors, panics, deadline overruns,
//! shape mismatches and out-of-range scores are logged and replaced by
//! the unit's zero-equivalent score.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures::FutureExt;

use crate::counters::COUNTERS;
use crate::error::UpstreamError;
use crate::metric::MetricUnit;
use crate::obs;
use crate::result::MetricResult;
use crate::score::{RawData, Score, ScoreShape};
use crate::subject::EvaluationSubject;

/// Why a metric run was forced to zero.
#[derive(Debug, thiserror::Error)]
pub enum RunFailure {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("expected a {expected:?} score, got {found:?}")]
    ShapeMismatch {
        expected: ScoreShape,
        found: ScoreShape,
    },

    #[error("score {0:?} is not finite and within [0, 1]")]
    OutOfRange(Score),
}

/// Runs metric units with uniform timing and failure containment.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricRunner {
    deadline: Option<Duration>,
}

impl MetricRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort `fetch` after `deadline` and score zero.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Execute `unit` against `subject`. Never fails and never panics.
    pub async fn run(&self, unit: &dyn MetricUnit, subject: &EvaluationSubject) -> MetricResult {
        let started = Instant::now();
        let outcome = self.attempt(unit, subject).await;
        let latency_ms = started.elapsed().as_millis() as u64;
        COUNTERS.inc_metrics_run();

        match outcome {
            Ok((score, raw_data)) => {
                obs::emit_metric_finished(unit.name(), score.scalar(), latency_ms);
                MetricResult {
                    name: unit.name().to_string(),
                    score,
                    latency_ms,
                    raw_data,
                    failed: false,
                }
            }
            Err(failure) => {
                COUNTERS.inc_metric_failures();
                obs::emit_metric_failed(unit.name(), &failure, latency_ms);
                MetricResult::zeroed(unit.name(), unit.shape(), latency_ms)
            }
        }
    }

    async fn attempt(
        &self,
        unit: &dyn MetricUnit,
        subject: &EvaluationSubject,
    ) -> Result<(Score, RawData), RunFailure> {
        let fetch = AssertUnwindSafe(unit.fetch(subject)).catch_unwind();
        let fetched = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, fetch)
                .await
                .map_err(|_| RunFailure::DeadlineExceeded(deadline))?,
            None => fetch.await,
        };
        let raw = fetched.map_err(|payload| RunFailure::Panicked(panic_message(payload.as_ref())))??;

        let score = std::panic::catch_unwind(AssertUnwindSafe(|| unit.score(&raw)))
            .map_err(|payload| RunFailure::Panicked(panic_message(payload.as_ref())))?;

        if score.shape() != unit.shape() {
            return Err(RunFailure::ShapeMismatch {
                expected: unit.shape(),
                found: score.shape(),
            });
        }
        if !score.is_normalized() {
            return Err(RunFailure::OutOfRange(score));
        }
        Ok((score, raw))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
