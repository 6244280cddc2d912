use std::sync::Arc;

use async_trait::async_trait;

use super::CODE_QUALITY;
use crate::error::UpstreamResult;
use crate::metric::MetricUnit;
use crate::providers::{SourceForge, StaticAnalyzer};
use crate::score::{RawData, Score};
use crate::subject::EvaluationSubject;

/// Upper bound on source files pulled from one repository.
pub const MAX_SOURCE_FILES: usize = 200;

const SOURCE_EXTENSION: &str = "py";

/// Static-analysis issue density: `ratio = issues / loc`.
pub fn code_quality_score(issues: Option<u64>, loc: Option<u64>) -> f64 {
    let (Some(issues), Some(loc)) = (issues, loc) else {
        return 0.0;
    };
    if loc == 0 {
        return 0.0;
    }
    let ratio = issues as f64 / loc as f64;
    if ratio <= 0.005 {
        1.0
    } else if ratio <= 0.015 {
        0.8
    } else if ratio < 0.03 {
        0.6
    } else if ratio <= 0.06 {
        0.4
    } else {
        0.2
    }
}

/// Issue density of the linked repository's Python sources.
pub struct CodeQualityMetric {
    forge: Arc<dyn SourceForge>,
    analyzer: Arc<dyn StaticAnalyzer>,
}

impl CodeQualityMetric {
    pub fn new(forge: Arc<dyn SourceForge>, analyzer: Arc<dyn StaticAnalyzer>) -> Self {
        Self { forge, analyzer }
    }
}

#[async_trait]
impl MetricUnit for CodeQualityMetric {
    fn name(&self) -> &'static str {
        CODE_QUALITY
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        let Some(code) = subject.code() else {
            return Ok(RawData::new());
        };
        let files = self
            .forge
            .source_files(code, SOURCE_EXTENSION, MAX_SOURCE_FILES)
            .await?;
        let loc: u64 = files.iter().map(|f| f.lines_of_code()).sum();
        let mut raw = RawData::new()
            .with("files", files.len() as u64)
            .with("loc", loc);
        if loc > 0 {
            raw.insert("issues", self.analyzer.count_issues(&files).await?);
        }
        Ok(raw)
    }

    fn score(&self, raw: &RawData) -> Score {
        Score::Scalar(code_quality_score(
            raw.get_u64("issues"),
            raw.get_u64("loc"),
        ))
    }
}
