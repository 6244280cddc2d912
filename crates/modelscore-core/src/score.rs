//! Score values and the raw facts they are computed from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deployment-hardware classes used by the size metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareTier {
    RaspberryPi,
    JetsonNano,
    DesktopPc,
    AwsServer,
}

impl HardwareTier {
    pub const ALL: [HardwareTier; 4] = [
        HardwareTier::RaspberryPi,
        HardwareTier::JetsonNano,
        HardwareTier::DesktopPc,
        HardwareTier::AwsServer,
    ];

    pub fn key(self) -> &'static str {
        match self {
            HardwareTier::RaspberryPi => "raspberry_pi",
            HardwareTier::JetsonNano => "jetson_nano",
            HardwareTier::DesktopPc => "desktop_pc",
            HardwareTier::AwsServer => "aws_server",
        }
    }
}

/// One score per hardware tier, serialized as a map with fixed keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierScores {
    pub raspberry_pi: f64,
    pub jetson_nano: f64,
    pub desktop_pc: f64,
    pub aws_server: f64,
}

impl TierScores {
    pub fn get(&self, tier: HardwareTier) -> f64 {
        match tier {
            HardwareTier::RaspberryPi => self.raspberry_pi,
            HardwareTier::JetsonNano => self.jetson_nano,
            HardwareTier::DesktopPc => self.desktop_pc,
            HardwareTier::AwsServer => self.aws_server,
        }
    }

    pub fn set(&mut self, tier: HardwareTier, value: f64) {
        match tier {
            HardwareTier::RaspberryPi => self.raspberry_pi = value,
            HardwareTier::JetsonNano => self.jetson_nano = value,
            HardwareTier::DesktopPc => self.desktop_pc = value,
            HardwareTier::AwsServer => self.aws_server = value,
        }
    }

    /// Arithmetic mean of the four tiers.
    pub fn mean(&self) -> f64 {
        HardwareTier::ALL.iter().map(|t| self.get(*t)).sum::<f64>() / HardwareTier::ALL.len() as f64
    }
}

/// Shape a metric's score is declared to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreShape {
    Scalar,
    Tiers,
}

impl ScoreShape {
    /// Zero-equivalent score of this shape.
    pub fn zero(self) -> Score {
        match self {
            ScoreShape::Scalar => Score::Scalar(0.0),
            ScoreShape::Tiers => Score::Tiers(TierScores::default()),
        }
    }
}

/// A normalized metric score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Scalar(f64),
    Tiers(TierScores),
}

impl Score {
    pub fn shape(&self) -> ScoreShape {
        match self {
            Score::Scalar(_) => ScoreShape::Scalar,
            Score::Tiers(_) => ScoreShape::Tiers,
        }
    }

    /// Scalar used for aggregation: identity, or the tier mean.
    pub fn scalar(&self) -> f64 {
        match self {
            Score::Scalar(v) => *v,
            Score::Tiers(tiers) => tiers.mean(),
        }
    }

    /// Every component is finite and within `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        match self {
            Score::Scalar(v) => in_range(*v),
            Score::Tiers(tiers) => HardwareTier::ALL.iter().all(|t| in_range(tiers.get(*t))),
        }
    }
}

/// Opaque intermediate facts gathered by a metric's fetch step.
///
/// Getters return `None` for absent, null or mistyped fields so scoring
/// can map them to its lowest bucket instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawData(Map<String, Value>);

impl RawData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64().filter(|v| v.is_finite())
    }

    /// Non-negative integer; integral floats such as `1e9` are accepted.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        let value = self.get(key)?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as u64)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RawData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
