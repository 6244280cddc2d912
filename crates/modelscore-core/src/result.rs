//! Per-metric and per-subject results.

use serde::{Deserialize, Serialize};

use crate::score::{RawData, Score, ScoreShape};

/// Outcome of running one metric unit against one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub name: String,
    pub score: Score,
    pub latency_ms: u64,
    /// Intermediate facts kept for diagnostics only.
    #[serde(default)]
    pub raw_data: RawData,
    /// Whether the score was forced to the zero-equivalent.
    #[serde(default)]
    pub failed: bool,
}

impl MetricResult {
    /// Zero-equivalent result for a unit that did not produce a score.
    pub fn zeroed(name: &str, shape: ScoreShape, latency_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            score: shape.zero(),
            latency_ms,
            raw_data: RawData::new(),
            failed: true,
        }
    }
}

/// Subject category. Only models are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    #[default]
    Model,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Model => "MODEL",
        }
    }
}

/// Aggregate of every metric for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub subject_name: String,
    pub category: Category,
    pub net_score: f64,
    /// Wall-clock span of the whole fan-out, not the sum of metric latencies.
    pub net_score_latency_ms: u64,
    /// One entry per unit, in registration order.
    pub metrics: Vec<MetricResult>,
}

impl CompositeResult {
    pub fn metric(&self, name: &str) -> Option<&MetricResult> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn failure_count(&self) -> usize {
        self.metrics.iter().filter(|m| m.failed).count()
    }
}
