use std::sync::Arc;

use async_trait::async_trait;

use super::PERFORMANCE_CLAIMS;
use crate::error::UpstreamResult;
use crate::metric::MetricUnit;
use crate::providers::ModelHub;
use crate::score::{RawData, Score};
use crate::subject::EvaluationSubject;

/// Popularity proxy for how credible a model's claims are:
/// `ratio = likes / downloads`, zero when either count is zero or missing.
pub fn performance_claims_score(likes: Option<u64>, downloads: Option<u64>) -> f64 {
    let ratio = match (likes, downloads) {
        (Some(likes), Some(downloads)) if likes > 0 && downloads > 0 => {
            likes as f64 / downloads as f64
        }
        _ => 0.0,
    };
    if ratio > 0.75 {
        1.0
    } else if ratio >= 0.5 {
        0.8
    } else if ratio >= 0.2 {
        0.6
    } else if ratio >= 0.1 {
        0.4
    } else if ratio >= 0.01 {
        0.2
    } else {
        0.0
    }
}

pub struct PerformanceClaimsMetric {
    hub: Arc<dyn ModelHub>,
}

impl PerformanceClaimsMetric {
    pub fn new(hub: Arc<dyn ModelHub>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl MetricUnit for PerformanceClaimsMetric {
    fn name(&self) -> &'static str {
        PERFORMANCE_CLAIMS
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        let info = self.hub.model_info(subject.model()).await?;
        Ok(RawData::new()
            .with("likes", info.likes)
            .with("downloads", info.downloads))
    }

    fn score(&self, raw: &RawData) -> Score {
        Score::Scalar(performance_claims_score(
            raw.get_u64("likes"),
            raw.get_u64("downloads"),
        ))
    }
}
