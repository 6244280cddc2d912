//! Flattening a [`CompositeResult`] into the emitted NDJSON record.
//!
//! Field order: `name`, `category`, `net_score`, `net_score_latency`, then
//! each metric in registration order followed by `<metric>_latency`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::result::CompositeResult;
use crate::score::{HardwareTier, Score};

/// One externally visible output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputRecord {
    fields: Map<String, Value>,
}

impl OutputRecord {
    pub fn from_composite(composite: &CompositeResult) -> Self {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::from(composite.subject_name.clone()));
        fields.insert("category".into(), Value::from(composite.category.as_str()));
        fields.insert("net_score".into(), Value::from(composite.net_score));
        fields.insert(
            "net_score_latency".into(),
            Value::from(composite.net_score_latency_ms),
        );
        for metric in &composite.metrics {
            fields.insert(metric.name.clone(), score_value(&metric.score));
            fields.insert(
                format!("{}_latency", metric.name),
                Value::from(metric.latency_ms),
            );
        }
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Serialize as a single line without the trailing newline.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.fields)
    }
}

impl From<&CompositeResult> for OutputRecord {
    fn from(composite: &CompositeResult) -> Self {
        Self::from_composite(composite)
    }
}

fn score_value(score: &Score) -> Value {
    match score {
        Score::Scalar(v) => Value::from(*v),
        Score::Tiers(tiers) => {
            let map: Map<String, Value> = HardwareTier::ALL
                .iter()
                .map(|tier| (tier.key().to_string(), Value::from(tiers.get(*tier))))
                .collect();
            Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Category, MetricResult};
    use crate::score::{RawData, ScoreShape, TierScores};

    fn composite() -> CompositeResult {
        CompositeResult {
            subject_name: "bert-base-uncased".into(),
            category: Category::Model,
            net_score: 0.42,
            net_score_latency_ms: 180,
            metrics: vec![
                MetricResult {
                    name: "license".into(),
                    score: Score::Scalar(1.0),
                    latency_ms: 12,
                    raw_data: RawData::new(),
                    failed: false,
                },
                MetricResult {
                    name: "size_score".into(),
                    score: Score::Tiers(TierScores {
                        raspberry_pi: 0.8,
                        jetson_nano: 1.0,
                        desktop_pc: 1.0,
                        aws_server: 1.0,
                    }),
                    latency_ms: 9,
                    raw_data: RawData::new(),
                    failed: false,
                },
                MetricResult::zeroed("code_quality", ScoreShape::Scalar, 0),
            ],
        }
    }

    #[test]
    fn field_order_is_fixed() {
        let record = OutputRecord::from_composite(&composite());
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(
            names,
            [
                "name",
                "category",
                "net_score",
                "net_score_latency",
                "license",
                "license_latency",
                "size_score",
                "size_score_latency",
                "code_quality",
                "code_quality_latency",
            ]
        );
    }

    #[test]
    fn serializes_on_one_line() {
        let line = OutputRecord::from_composite(&composite()).to_json_line().unwrap();
        assert!(!line.contains('\n'));
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["category"], "MODEL");
        assert_eq!(parsed["net_score"], 0.42);
        assert_eq!(parsed["net_score_latency"], 180);
        assert_eq!(parsed["size_score"]["raspberry_pi"], 0.8);
        assert_eq!(parsed["code_quality"], 0.0);
        assert!(line.starts_with(r#"{"name":"bert-base-uncased","category":"MODEL""#));
    }
}
