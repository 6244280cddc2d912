use std::sync::Arc;

use async_trait::async_trait;

use super::judge::{ask, build_prompt, judged_score, or_none, truncate_readme};
use super::DATASET_AND_CODE_SCORE;
use crate::error::UpstreamResult;
use crate::metric::MetricUnit;
use crate::providers::{CompletionService, ModelHub};
use crate::score::{RawData, Score};
use crate::subject::EvaluationSubject;

const RUBRIC: &str = "\
You are assessing whether a machine-learning model documents the dataset it was trained on \
and links to the code used to train or run it. 1 means both the training data and the code \
are clearly identified and available, 0.5 means only one of them is, 0 means neither.";

/// Repository paths listed in the prompt beyond this count are elided.
const LISTED_FILE_LIMIT: usize = 50;

fn list_files(files: &[String]) -> Option<String> {
    if files.is_empty() {
        return None;
    }
    let mut listing = files
        .iter()
        .take(LISTED_FILE_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    if files.len() > LISTED_FILE_LIMIT {
        listing.push_str(&format!("\n... and {} more", files.len() - LISTED_FILE_LIMIT));
    }
    Some(listing)
}

/// Availability of training data and code, judged from the model README,
/// the model repository's file listing and the links supplied alongside
/// the model.
pub struct DatasetAndCodeMetric {
    hub: Arc<dyn ModelHub>,
    completion: Arc<dyn CompletionService>,
}

impl DatasetAndCodeMetric {
    pub fn new(hub: Arc<dyn ModelHub>, completion: Arc<dyn CompletionService>) -> Self {
        Self { hub, completion }
    }
}

#[async_trait]
impl MetricUnit for DatasetAndCodeMetric {
    fn name(&self) -> &'static str {
        DATASET_AND_CODE_SCORE
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        let (info, readme) = tokio::try_join!(
            self.hub.model_info(subject.model()),
            self.hub.readme(subject.model())
        )?;
        let prompt = build_prompt(
            RUBRIC,
            &[
                ("Model", subject.model().raw().to_string()),
                ("Dataset link", or_none(subject.dataset().map(|d| d.raw().to_string()))),
                ("Code link", or_none(subject.code().map(|c| c.raw().to_string()))),
                ("Repository files", or_none(list_files(&info.files))),
                ("README", or_none(readme.as_deref().map(truncate_readme))),
            ],
        );
        ask(self.completion.as_ref(), &prompt).await
    }

    fn score(&self, raw: &RawData) -> Score {
        Score::Scalar(judged_score(raw))
    }
}
