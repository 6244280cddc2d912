//! Immutable metric weight table.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metrics;

/// Mapping from metric name to a non-negative, finite weight.
///
/// Built once at startup and shared read-only with the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct WeightTable {
    weights: BTreeMap<String, f64>,
}

impl Default for WeightTable {
    /// Standard weights for the eight standard metrics.
    fn default() -> Self {
        let weights = [
            (metrics::RAMP_UP_TIME, 0.10),
            (metrics::BUS_FACTOR, 0.15),
            (metrics::PERFORMANCE_CLAIMS, 0.10),
            (metrics::LICENSE, 0.10),
            (metrics::SIZE_SCORE, 0.10),
            (metrics::DATASET_AND_CODE_SCORE, 0.15),
            (metrics::DATASET_QUALITY, 0.15),
            (metrics::CODE_QUALITY, 0.15),
        ]
        .into_iter()
        .map(|(name, weight)| (name.to_string(), weight))
        .collect();
        Self { weights }
    }
}

impl TryFrom<BTreeMap<String, f64>> for WeightTable {
    type Error = ConfigError;

    fn try_from(weights: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        if let Some((metric, weight)) = weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ConfigError::InvalidWeight {
                metric: metric.clone(),
                weight: *weight,
            });
        }
        Ok(Self { weights })
    }
}

impl From<WeightTable> for BTreeMap<String, f64> {
    fn from(table: WeightTable) -> Self {
        table.weights
    }
}

impl WeightTable {
    /// Build from `(name, weight)` pairs, rejecting negative or non-finite weights.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let weights: BTreeMap<String, f64> =
            pairs.into_iter().map(|(name, w)| (name.into(), w)).collect();
        Self::try_from(weights)
    }

    /// Load a JSON object of `metric name -> weight`.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::WeightsFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let weights: BTreeMap<String, f64> =
            serde_json::from_str(&text).map_err(|e| ConfigError::WeightsFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::try_from(weights)
    }

    pub fn weight(&self, metric: &str) -> Option<f64> {
        self.weights.get(metric).copied()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Check that exactly `metric_names` are weighted.
    pub fn validate<'a, I>(&self, metric_names: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = metric_names.into_iter().collect();
        if let Some(missing) = names.iter().find(|n| !self.weights.contains_key(**n)) {
            return Err(ConfigError::MissingWeight {
                metric: missing.to_string(),
            });
        }
        if let Some(unknown) = self.weights.keys().find(|k| !names.contains(&k.as_str())) {
            return Err(ConfigError::UnknownWeight {
                metric: unknown.clone(),
            });
        }
        Ok(())
    }
}
