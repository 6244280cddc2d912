use std::sync::Arc;

use async_trait::async_trait;

use super::SIZE_SCORE;
use crate::error::UpstreamResult;
use crate::metric::MetricUnit;
use crate::providers::ModelHub;
use crate::score::{HardwareTier, RawData, Score, ScoreShape, TierScores};
use crate::subject::EvaluationSubject;

const M: u64 = 1_000_000;
const B: u64 = 1_000_000_000;

/// Scores awarded for fitting under the 1st..4th threshold of a ladder.
const LADDER_SCORES: [f64; 4] = [1.0, 0.8, 0.5, 0.2];

fn ladder(tier: HardwareTier) -> [u64; 4] {
    match tier {
        HardwareTier::RaspberryPi => [50 * M, 200 * M, 500 * M, B],
        HardwareTier::JetsonNano => [200 * M, B, 3 * B, 7 * B],
        HardwareTier::DesktopPc => [B, 7 * B, 13 * B, 30 * B],
        HardwareTier::AwsServer => [7 * B, 30 * B, 70 * B, 200 * B],
    }
}

/// Deployability per hardware tier. A missing or zero parameter count
/// scores zero on every tier.
pub fn size_score(params: Option<u64>) -> TierScores {
    let mut scores = TierScores::default();
    let Some(params) = params.filter(|p| *p > 0) else {
        return scores;
    };
    for tier in HardwareTier::ALL {
        let value = ladder(tier)
            .iter()
            .zip(LADDER_SCORES)
            .find(|(threshold, _)| params <= **threshold)
            .map(|(_, score)| score)
            .unwrap_or(0.0);
        scores.set(tier, value);
    }
    scores
}

pub struct SizeMetric {
    hub: Arc<dyn ModelHub>,
}

impl SizeMetric {
    pub fn new(hub: Arc<dyn ModelHub>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl MetricUnit for SizeMetric {
    fn name(&self) -> &'static str {
        SIZE_SCORE
    }

    fn shape(&self) -> ScoreShape {
        ScoreShape::Tiers
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        let info = self.hub.model_info(subject.model()).await?;
        Ok(RawData::new().with("params", info.parameters))
    }

    fn score(&self, raw: &RawData) -> Score {
        Score::Tiers(size_score(raw.get_u64("params")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn missing_params_scores_all_zero() {
        let unit = SizeMetric::new(Arc::new(crate::fakes::StaticModelHub::new()));
        let raw = RawData::new().with("params", Value::Null);
        assert_eq!(unit.score(&raw), Score::Tiers(TierScores::default()));
        assert_eq!(size_score(Some(0)), TierScores::default());
    }

    #[test]
    fn small_model_fits_everywhere() {
        let scores = size_score(Some(30 * M));
        for tier in HardwareTier::ALL {
            assert_eq!(scores.get(tier), 1.0, "{tier:?}");
        }
    }

    #[test]
    fn bert_base_sized_model() {
        let scores = size_score(Some(110 * M));
        assert_eq!(scores.raspberry_pi, 0.8);
        assert_eq!(scores.jetson_nano, 1.0);
        assert_eq!(scores.desktop_pc, 1.0);
        assert_eq!(scores.aws_server, 1.0);
    }

    #[test]
    fn large_model_falls_off_small_tiers() {
        let scores = size_score(Some(70 * B));
        assert_eq!(scores.raspberry_pi, 0.0);
        assert_eq!(scores.jetson_nano, 0.0);
        assert_eq!(scores.desktop_pc, 0.0);
        assert_eq!(scores.aws_server, 0.5);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(size_score(Some(B)).raspberry_pi, 0.2);
        assert_eq!(size_score(Some(B + 1)).raspberry_pi, 0.0);
    }
}
