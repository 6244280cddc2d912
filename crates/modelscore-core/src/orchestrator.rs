//! Parallel evaluation of one subject against the full metric set.
//!
//! Every unit runs in its own task through [`MetricRunner`], bounded by a
//! semaphore. Results are recombined in registration order, so the
//! composite score does not depend on completion order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{warn, Instrument};

use crate::counters::COUNTERS;
use crate::error::ConfigError;
use crate::metric::MetricUnit;
use crate::obs;
use crate::result::{Category, CompositeResult, MetricResult};
use crate::runner::MetricRunner;
use crate::score::Score;
use crate::subject::EvaluationSubject;
use crate::weights::WeightTable;

/// Default bound on concurrently running metric units.
pub const DEFAULT_PARALLELISM: usize = 8;

/// Slack for floating-point error when summing weights.
const WEIGHT_TOTAL_TOLERANCE: f64 = 1e-9;

/// Configuration for an [`Orchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of concurrent metric tasks (at least one).
    pub parallelism: usize,
    /// Optional per-metric deadline applied to `fetch`.
    pub metric_deadline: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            metric_deadline: None,
        }
    }
}

struct WeightedUnit {
    unit: Arc<dyn MetricUnit>,
    weight: f64,
}

/// Evaluates subjects against a fixed, validated set of weighted units.
pub struct Orchestrator {
    units: Vec<WeightedUnit>,
    runner: MetricRunner,
    parallelism: usize,
}

impl Orchestrator {
    /// Pair every unit with its weight.
    ///
    /// Fails when a unit has no weight, a weight names no unit, two units
    /// share a name, or the weights sum to more than 1. A net score
    /// therefore always lands in `[0, 1]`.
    pub fn new(
        units: Vec<Arc<dyn MetricUnit>>,
        weights: &WeightTable,
        config: OrchestratorConfig,
    ) -> Result<Self, ConfigError> {
        let names: Vec<&'static str> = units.iter().map(|u| u.name()).collect();
        if let Some(dup) = names
            .iter()
            .enumerate()
            .find(|(idx, name)| names[..*idx].contains(*name))
            .map(|(_, name)| *name)
        {
            return Err(ConfigError::DuplicateMetric {
                metric: dup.to_string(),
            });
        }
        weights.validate(names.iter().copied())?;

        let total = weights.total();
        if total > 1.0 + WEIGHT_TOTAL_TOLERANCE {
            return Err(ConfigError::WeightTotal { total });
        }

        let units = units
            .into_iter()
            .map(|unit| {
                let weight = weights.weight(unit.name()).unwrap_or_default();
                WeightedUnit { unit, weight }
            })
            .collect();

        let mut runner = MetricRunner::new();
        if let Some(deadline) = config.metric_deadline {
            runner = runner.with_deadline(deadline);
        }

        Ok(Self {
            units,
            runner,
            parallelism: config.parallelism.max(1),
        })
    }

    /// Registered metric names, in output order.
    pub fn metric_names(&self) -> Vec<&'static str> {
        self.units.iter().map(|w| w.unit.name()).collect()
    }

    /// Evaluate `subject`. Never fails: broken metrics score zero.
    pub async fn evaluate(&self, subject: &EvaluationSubject) -> CompositeResult {
        let subject_name = subject.display_name().to_string();
        let span = obs::subject_span(&subject_name);
        span.in_scope(|| obs::emit_evaluation_started(&subject_name, self.units.len()));

        let shared = Arc::new(subject.clone());
        let sem = Arc::new(Semaphore::new(self.parallelism.min(self.units.len()).max(1)));
        let started = Instant::now();

        let mut tasks = Vec::with_capacity(self.units.len());
        for weighted in &self.units {
            let unit = Arc::clone(&weighted.unit);
            let subject = Arc::clone(&shared);
            let sem = Arc::clone(&sem);
            let runner = self.runner;

            let task = tokio::spawn(
                async move {
                    let _permit = sem.acquire_owned().await.ok();
                    runner.run(unit.as_ref(), &subject).await
                }
                .instrument(span.clone()),
            );
            tasks.push(task);
        }

        let mut metrics = Vec::with_capacity(tasks.len());
        for (weighted, task) in self.units.iter().zip(tasks) {
            match task.await {
                Ok(result) => metrics.push(result),
                Err(e) => {
                    warn!(metric = weighted.unit.name(), error = %e, "metric task did not complete");
                    COUNTERS.inc_metric_failures();
                    metrics.push(MetricResult::zeroed(
                        weighted.unit.name(),
                        weighted.unit.shape(),
                        started.elapsed().as_millis() as u64,
                    ));
                }
            }
        }
        let net_score_latency_ms = started.elapsed().as_millis() as u64;

        let net_score = compute_net_score(
            self.units
                .iter()
                .zip(&metrics)
                .map(|(weighted, result)| (weighted.weight, &result.score)),
        );

        let composite = CompositeResult {
            subject_name,
            category: Category::Model,
            net_score,
            net_score_latency_ms,
            metrics,
        };

        span.in_scope(|| {
            obs::emit_evaluation_finished(
                &composite.subject_name,
                composite.net_score,
                composite.net_score_latency_ms,
                composite.failure_count(),
            )
        });
        COUNTERS.inc_subjects_evaluated();
        composite
    }
}

/// `Σ weight * scalar(score)`, rounded to two decimal places.
pub fn compute_net_score<'a, I>(weighted_scores: I) -> f64
where
    I: IntoIterator<Item = (f64, &'a Score)>,
{
    let sum: f64 = weighted_scores
        .into_iter()
        .map(|(weight, score)| weight * score.scalar())
        .sum();
    round2(sum)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FailingUnit, FailureMode, StubUnit};
    use crate::score::{ScoreShape, TierScores};
    use crate::subject::SubjectIdentifier;

    fn subject() -> EvaluationSubject {
        EvaluationSubject::new(SubjectIdentifier::model("https://huggingface.co/org/model"))
    }

    #[test]
    fn net_score_uses_tier_mean_and_rounds() {
        let tiers = Score::Tiers(TierScores {
            raspberry_pi: 0.0,
            jetson_nano: 0.5,
            desktop_pc: 1.0,
            aws_server: 1.0,
        });
        let scalar = Score::Scalar(0.333);
        let net = compute_net_score([(0.5, &tiers), (0.5, &scalar)]);
        // 0.5 * 0.625 + 0.5 * 0.333 = 0.479
        assert_eq!(net, 0.48);
    }

    #[test]
    fn rejects_unweighted_unit() {
        let units: Vec<Arc<dyn MetricUnit>> = vec![
            Arc::new(StubUnit::scalar("license", 1.0)),
            Arc::new(StubUnit::scalar("bus_factor", 1.0)),
        ];
        let weights = WeightTable::from_pairs([("license", 1.0)]).unwrap();
        let err = Orchestrator::new(units, &weights, OrchestratorConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::MissingWeight { .. }));
    }

    #[test]
    fn rejects_weights_summing_above_one() {
        let units: Vec<Arc<dyn MetricUnit>> = vec![
            Arc::new(StubUnit::scalar("license", 1.0)),
            Arc::new(StubUnit::scalar("bus_factor", 1.0)),
        ];
        let weights = WeightTable::from_pairs([("license", 1.0), ("bus_factor", 1.0)]).unwrap();
        let err = Orchestrator::new(units, &weights, OrchestratorConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::WeightTotal { total } if total == 2.0));
    }

    #[tokio::test]
    async fn full_weight_on_perfect_scores_caps_at_one() {
        let units: Vec<Arc<dyn MetricUnit>> = vec![
            Arc::new(StubUnit::scalar("license", 1.0)),
            Arc::new(StubUnit::scalar("bus_factor", 1.0)),
        ];
        let weights = WeightTable::from_pairs([("license", 0.7), ("bus_factor", 0.3)]).unwrap();
        let orchestrator =
            Orchestrator::new(units, &weights, OrchestratorConfig::default()).unwrap();
        let result = orchestrator.evaluate(&subject()).await;
        assert!(result.net_score <= 1.0);
        assert_eq!(result.net_score, 1.0);
    }

    #[test]
    fn rejects_duplicate_unit_names() {
        let units: Vec<Arc<dyn MetricUnit>> = vec![
            Arc::new(StubUnit::scalar("license", 1.0)),
            Arc::new(StubUnit::scalar("license", 0.5)),
        ];
        let weights = WeightTable::from_pairs([("license", 1.0)]).unwrap();
        let err = Orchestrator::new(units, &weights, OrchestratorConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::DuplicateMetric { metric } if metric == "license"));
    }

    #[tokio::test]
    async fn failing_unit_does_not_disturb_siblings() {
        let units: Vec<Arc<dyn MetricUnit>> = vec![
            Arc::new(StubUnit::scalar("license", 1.0)),
            Arc::new(FailingUnit::new("bus_factor", FailureMode::FetchPanic)),
            Arc::new(
                FailingUnit::new("size_score", FailureMode::FetchError)
                    .with_shape(ScoreShape::Tiers),
            ),
        ];
        let weights =
            WeightTable::from_pairs([("license", 0.5), ("bus_factor", 0.25), ("size_score", 0.25)])
                .unwrap();
        let orchestrator =
            Orchestrator::new(units, &weights, OrchestratorConfig::default()).unwrap();

        let result = orchestrator.evaluate(&subject()).await;
        assert_eq!(result.net_score, 0.5);
        assert_eq!(result.failure_count(), 2);
        assert_eq!(
            result.metric("size_score").unwrap().score,
            Score::Tiers(TierScores::default())
        );
        let names: Vec<&str> = result.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["license", "bus_factor", "size_score"]);
    }

    #[tokio::test]
    async fn parallelism_of_one_still_runs_everything() {
        let a = Arc::new(StubUnit::scalar("license", 1.0));
        let b = Arc::new(StubUnit::scalar("bus_factor", 0.0));
        let units: Vec<Arc<dyn MetricUnit>> = vec![a.clone(), b.clone()];
        let weights = WeightTable::from_pairs([("license", 0.5), ("bus_factor", 0.5)]).unwrap();
        let config = OrchestratorConfig {
            parallelism: 1,
            ..OrchestratorConfig::default()
        };
        let orchestrator = Orchestrator::new(units, &weights, config).unwrap();

        assert_eq!(orchestrator.metric_names(), ["license", "bus_factor"]);

        let result = orchestrator.evaluate(&subject()).await;
        assert_eq!(result.net_score, 0.5);
        assert_eq!(a.fetch_count(), 1);
        assert_eq!(b.fetch_count(), 1);
    }
}
