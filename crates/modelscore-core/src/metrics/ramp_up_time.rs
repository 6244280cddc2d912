use std::sync::Arc;

use async_trait::async_trait;

use super::judge::{ask, build_prompt, judged_score, or_none, truncate_readme};
use super::RAMP_UP_TIME;
use crate::error::UpstreamResult;
use crate::metric::MetricUnit;
use crate::providers::{CompletionService, ModelHub};
use crate::score::{RawData, Score};
use crate::subject::EvaluationSubject;

const RUBRIC: &str = "\
You are assessing how quickly a new engineer could start using a machine-learning model \
based on its documentation. Consider installation steps, usage examples, API clarity and \
whether inputs and outputs are described. 1 means trivial to pick up, 0 means no usable \
documentation.";

/// Documentation ramp-up difficulty, judged from the model README.
pub struct RampUpTimeMetric {
    hub: Arc<dyn ModelHub>,
    completion: Arc<dyn CompletionService>,
}

impl RampUpTimeMetric {
    pub fn new(hub: Arc<dyn ModelHub>, completion: Arc<dyn CompletionService>) -> Self {
        Self { hub, completion }
    }
}

#[async_trait]
impl MetricUnit for RampUpTimeMetric {
    fn name(&self) -> &'static str {
        RAMP_UP_TIME
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        let model = subject.model();
        let readme = self.hub.readme(model).await?;
        let prompt = build_prompt(
            RUBRIC,
            &[
                ("Model", model.raw().to_string()),
                ("README", or_none(readme.as_deref().map(truncate_readme))),
            ],
        );
        ask(self.completion.as_ref(), &prompt).await
    }

    fn score(&self, raw: &RawData) -> Score {
        Score::Scalar(judged_score(raw))
    }
}
