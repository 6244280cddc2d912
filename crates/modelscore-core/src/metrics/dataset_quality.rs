use std::sync::Arc;

use async_trait::async_trait;

use super::judge::{ask, build_prompt, judged_score, or_none, truncate_readme};
use super::DATASET_QUALITY;
use crate::error::UpstreamResult;
use crate::metric::MetricUnit;
use crate::providers::{CompletionService, ModelHub};
use crate::score::{RawData, Score};
use crate::subject::{EvaluationSubject, LinkSource};

const RUBRIC: &str = "\
You are assessing the quality of a dataset used to train a machine-learning model. Consider \
documentation of its source and collection process, size, licensing, known biases and \
maintenance. 1 means thoroughly documented and well curated, 0 means nothing is known.";

/// Dataset documentation quality. Scores zero without a linked dataset.
pub struct DatasetQualityMetric {
    hub: Arc<dyn ModelHub>,
    completion: Arc<dyn CompletionService>,
}

impl DatasetQualityMetric {
    pub fn new(hub: Arc<dyn ModelHub>, completion: Arc<dyn CompletionService>) -> Self {
        Self { hub, completion }
    }
}

#[async_trait]
impl MetricUnit for DatasetQualityMetric {
    fn name(&self) -> &'static str {
        DATASET_QUALITY
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        let Some(dataset) = subject.dataset() else {
            return Ok(RawData::new());
        };
        let readme = match dataset.source() {
            Some(LinkSource::HuggingFace) => self.hub.readme(dataset).await?,
            _ => None,
        };
        let prompt = build_prompt(
            RUBRIC,
            &[
                ("Dataset", dataset.raw().to_string()),
                ("README", or_none(readme.as_deref().map(truncate_readme))),
            ],
        );
        ask(self.completion.as_ref(), &prompt).await
    }

    fn score(&self, raw: &RawData) -> Score {
        Score::Scalar(judged_score(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{ScriptedCompletion, StaticModelHub};
    use crate::subject::SubjectIdentifier;

    fn model() -> SubjectIdentifier {
        SubjectIdentifier::model("https://huggingface.co/google/bert-base-uncased")
    }

    #[tokio::test]
    async fn no_dataset_means_no_completion_call() {
        let completion = Arc::new(ScriptedCompletion::replying("0.9"));
        let unit = DatasetQualityMetric::new(Arc::new(StaticModelHub::new()), completion.clone());
        let raw = unit.fetch(&EvaluationSubject::new(model())).await.unwrap();
        assert!(raw.is_empty());
        assert_eq!(unit.score(&raw), Score::Scalar(0.0));
        assert!(completion.prompts().is_empty());
    }

    #[tokio::test]
    async fn hub_dataset_readme_is_used() {
        let hub = StaticModelHub::new()
            .with_readme("bookcorpus/bookcorpus", "Collected from 11,038 unpublished books.");
        let completion = Arc::new(ScriptedCompletion::replying("0.6"));
        let unit = DatasetQualityMetric::new(Arc::new(hub), completion.clone());
        let subject = EvaluationSubject::new(model()).with_dataset(SubjectIdentifier::dataset(
            "https://huggingface.co/datasets/bookcorpus/bookcorpus",
        ));

        let raw = unit.fetch(&subject).await.unwrap();
        assert_eq!(unit.score(&raw), Score::Scalar(0.6));
        assert!(completion.prompts()[0].contains("11,038 unpublished books"));
    }
}
