//! In-memory fakes for the collaborator traits and the metric contract.
//!
//! Provides `StaticModelHub`, `StaticSourceForge`, `ScriptedCompletion` and
//! `FixedAnalyzer` that satisfy the provider traits without any network,
//! plus `StubUnit` and `FailingUnit` for exercising the runner and the
//! orchestrator directly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{UpstreamError, UpstreamResult};
use crate::metric::MetricUnit;
use crate::providers::{
    CompletionService, ModelHub, ModelInfo, SourceFile, SourceForge, StaticAnalyzer,
};
use crate::score::{RawData, Score, ScoreShape};
use crate::subject::{EvaluationSubject, SubjectIdentifier};

fn key(id: &SubjectIdentifier) -> String {
    id.repo_id().unwrap_or_else(|| id.raw().to_string())
}

fn not_found(service: &'static str) -> UpstreamError {
    UpstreamError::Status {
        service,
        status: 404,
    }
}

// ---------------------------------------------------------------------------
// StaticModelHub
// ---------------------------------------------------------------------------

/// Model hub answering from fixed maps keyed by `owner/name`.
/// Unknown models yield a 404 status error.
#[derive(Debug, Default)]
pub struct StaticModelHub {
    models: HashMap<String, ModelInfo>,
    readmes: HashMap<String, String>,
}

impl StaticModelHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, repo_id: &str, info: ModelInfo) -> Self {
        self.models.insert(repo_id.to_string(), info);
        self
    }

    pub fn with_readme(mut self, repo_id: &str, readme: &str) -> Self {
        self.readmes.insert(repo_id.to_string(), readme.to_string());
        self
    }
}

#[async_trait]
impl ModelHub for StaticModelHub {
    async fn model_info(&self, model: &SubjectIdentifier) -> UpstreamResult<ModelInfo> {
        self.models
            .get(&key(model))
            .cloned()
            .ok_or_else(|| not_found("model-hub"))
    }

    async fn readme(&self, subject: &SubjectIdentifier) -> UpstreamResult<Option<String>> {
        Ok(self.readmes.get(&key(subject)).cloned())
    }
}

// ---------------------------------------------------------------------------
// StaticSourceForge
// ---------------------------------------------------------------------------

/// Source forge answering from fixed maps keyed by `owner/repo`.
#[derive(Debug, Default)]
pub struct StaticSourceForge {
    contributors: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<SourceFile>>,
}

impl StaticSourceForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contributors(mut self, repo_id: &str, logins: &[&str]) -> Self {
        self.contributors.insert(
            repo_id.to_string(),
            logins.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    pub fn with_files(mut self, repo_id: &str, files: Vec<SourceFile>) -> Self {
        self.files.insert(repo_id.to_string(), files);
        self
    }
}

#[async_trait]
impl SourceForge for StaticSourceForge {
    async fn contributors(&self, repo: &SubjectIdentifier) -> UpstreamResult<Vec<String>> {
        self.contributors
            .get(&key(repo))
            .cloned()
            .ok_or_else(|| not_found("source-forge"))
    }

    async fn source_files(
        &self,
        repo: &SubjectIdentifier,
        extension: &str,
        limit: usize,
    ) -> UpstreamResult<Vec<SourceFile>> {
        let suffix = format!(".{extension}");
        let files = self.files.get(&key(repo)).ok_or_else(|| not_found("source-forge"))?;
        Ok(files
            .iter()
            .filter(|f| f.path.ends_with(&suffix))
            .take(limit)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// ScriptedCompletion
// ---------------------------------------------------------------------------

/// Completion service returning a fixed reply (or a fixed failure) and
/// recording every prompt it receives.
#[derive(Debug)]
pub struct ScriptedCompletion {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like an endpoint with no API key configured.
    pub fn unavailable() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> UpstreamResult<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());
        self.reply.clone().ok_or(UpstreamError::MissingCredential {
            variable: "GEN_AI_STUDIO_API_KEY",
        })
    }
}

// ---------------------------------------------------------------------------
// FixedAnalyzer
// ---------------------------------------------------------------------------

/// Static analyzer reporting a fixed issue count for any non-empty input.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnalyzer {
    issues: u64,
}

impl FixedAnalyzer {
    pub fn new(issues: u64) -> Self {
        Self { issues }
    }
}

#[async_trait]
impl StaticAnalyzer for FixedAnalyzer {
    async fn count_issues(&self, files: &[SourceFile]) -> UpstreamResult<u64> {
        Ok(if files.is_empty() { 0 } else { self.issues })
    }
}

// ---------------------------------------------------------------------------
// StubUnit / FailingUnit
// ---------------------------------------------------------------------------

/// Metric unit with canned raw data and a fixed score.
#[derive(Debug)]
pub struct StubUnit {
    name: &'static str,
    score: Score,
    raw: RawData,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl StubUnit {
    pub fn new(name: &'static str, score: Score) -> Self {
        Self {
            name,
            score,
            raw: RawData::new(),
            delay: None,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn scalar(name: &'static str, value: f64) -> Self {
        Self::new(name, Score::Scalar(value))
    }

    pub fn with_raw(mut self, raw: RawData) -> Self {
        self.raw = raw;
        self
    }

    /// Sleep this long inside `fetch`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of completed `fetch` calls.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricUnit for StubUnit {
    fn name(&self) -> &'static str {
        self.name
    }

    fn shape(&self) -> ScoreShape {
        self.score.shape()
    }

    async fn fetch(&self, _subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.raw.clone())
    }

    fn score(&self, _raw: &RawData) -> Score {
        self.score
    }
}

/// How a [`FailingUnit`] misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// `fetch` returns an upstream error.
    FetchError,
    /// `fetch` panics.
    FetchPanic,
    /// `score` panics.
    ScorePanic,
    /// `score` returns a value outside `[0, 1]`.
    OutOfRange,
    /// `score` returns the other shape.
    WrongShape,
    /// `fetch` never completes.
    Hang,
}

/// Metric unit that always fails in the configured way.
#[derive(Debug)]
pub struct FailingUnit {
    name: &'static str,
    shape: ScoreShape,
    mode: FailureMode,
}

impl FailingUnit {
    pub fn new(name: &'static str, mode: FailureMode) -> Self {
        Self {
            name,
            shape: ScoreShape::Scalar,
            mode,
        }
    }

    pub fn with_shape(mut self, shape: ScoreShape) -> Self {
        self.shape = shape;
        self
    }
}

#[async_trait]
impl MetricUnit for FailingUnit {
    fn name(&self) -> &'static str {
        self.name
    }

    fn shape(&self) -> ScoreShape {
        self.shape
    }

    async fn fetch(&self, _subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        match self.mode {
            FailureMode::FetchError => Err(UpstreamError::Http {
                service: "stub",
                detail: "connection refused".to_string(),
            }),
            FailureMode::FetchPanic => panic!("fetch exploded in {}", self.name),
            FailureMode::Hang => {
                std::future::pending::<()>().await;
                Ok(RawData::new())
            }
            _ => Ok(RawData::new()),
        }
    }

    fn score(&self, _raw: &RawData) -> Score {
        match self.mode {
            FailureMode::ScorePanic => panic!("score exploded in {}", self.name),
            FailureMode::OutOfRange => Score::Scalar(1.5),
            FailureMode::WrongShape => match self.shape {
                ScoreShape::Scalar => ScoreShape::Tiers.zero(),
                ScoreShape::Tiers => Score::Scalar(0.5),
            },
            _ => self.shape.zero(),
        }
    }
}
