use std::sync::Arc;

use async_trait::async_trait;

use super::BUS_FACTOR;
use crate::error::UpstreamResult;
use crate::metric::MetricUnit;
use crate::providers::{ModelHub, SourceForge};
use crate::score::{RawData, Score};
use crate::subject::EvaluationSubject;

const BILLION: f64 = 1e9;

/// Contributor redundancy relative to model scale.
///
/// `ratio = contributors / max(params / 1e9, 1)`.
pub fn bus_factor_score(params: Option<u64>, contributors: Option<u64>) -> f64 {
    let (Some(params), Some(contributors)) = (params, contributors) else {
        return 0.0;
    };
    if contributors == 0 {
        return 0.2;
    }
    let ratio = contributors as f64 / (params as f64 / BILLION).max(1.0);
    if ratio < 1.0 {
        0.4
    } else if ratio < 3.0 {
        0.6
    } else if ratio < 10.0 {
        0.8
    } else {
        1.0
    }
}

/// Distinct contributors of the linked code repository, scaled by the
/// model's parameter count.
pub struct BusFactorMetric {
    hub: Arc<dyn ModelHub>,
    forge: Arc<dyn SourceForge>,
}

impl BusFactorMetric {
    pub fn new(hub: Arc<dyn ModelHub>, forge: Arc<dyn SourceForge>) -> Self {
        Self { hub, forge }
    }
}

#[async_trait]
impl MetricUnit for BusFactorMetric {
    fn name(&self) -> &'static str {
        BUS_FACTOR
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        let Some(code) = subject.code() else {
            return Ok(RawData::new());
        };
        let (info, contributors) = tokio::try_join!(
            self.hub.model_info(subject.model()),
            self.forge.contributors(code),
        )?;
        Ok(RawData::new()
            .with("params", info.parameters)
            .with("contributors", contributors.len() as u64))
    }

    fn score(&self, raw: &RawData) -> Score {
        Score::Scalar(bus_factor_score(
            raw.get_u64("params"),
            raw.get_u64("contributors"),
        ))
    }
}
