//! Collaborator traits for upstream data sources.
//!
//! - `ModelHub`: model/dataset metadata and README text
//! - `SourceForge`: contributor listings and repository source files
//! - `CompletionService`: hosted chat completion used for qualitative judgments
//! - `StaticAnalyzer`: issue counting over a set of source files
//!
//! All traits are async and backend-agnostic. In-memory fakes live in the
//! [`crate::fakes`] module; network implementations live in the
//! `modelscore-providers` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamResult;
use crate::subject::SubjectIdentifier;

/// Metadata the model hub reports for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Total parameter count from the weight index, when published.
    pub parameters: Option<u64>,
    /// License identifier as written on the model card.
    pub license: Option<String>,
    pub downloads: Option<u64>,
    pub likes: Option<u64>,
    /// Repository file paths.
    pub files: Vec<String>,
}

/// One source file fetched from a code repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Repository-relative path.
    pub path: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Count of non-blank lines.
    pub fn lines_of_code(&self) -> u64 {
        self.contents.lines().filter(|l| !l.trim().is_empty()).count() as u64
    }
}

/// Model/dataset metadata source.
#[async_trait]
pub trait ModelHub: Send + Sync {
    /// Fetch metadata for a model identifier.
    async fn model_info(&self, model: &SubjectIdentifier) -> UpstreamResult<ModelInfo>;

    /// Fetch the README of a model or dataset. `Ok(None)` when the
    /// repository has no README.
    async fn readme(&self, subject: &SubjectIdentifier) -> UpstreamResult<Option<String>>;
}

/// Source-code forge.
#[async_trait]
pub trait SourceForge: Send + Sync {
    /// Distinct contributor identities for a code repository.
    async fn contributors(&self, repo: &SubjectIdentifier) -> UpstreamResult<Vec<String>>;

    /// Up to `limit` files whose path ends in `.{extension}`.
    async fn source_files(
        &self,
        repo: &SubjectIdentifier,
        extension: &str,
        limit: usize,
    ) -> UpstreamResult<Vec<SourceFile>>;
}

/// Hosted chat-completion endpoint.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send a single user prompt and return the reply text.
    async fn complete(&self, prompt: &str) -> UpstreamResult<String>;
}

/// Static-analysis tool.
#[async_trait]
pub trait StaticAnalyzer: Send + Sync {
    /// Total issues reported across `files`.
    async fn count_issues(&self, files: &[SourceFile]) -> UpstreamResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_of_code_skips_blank_lines() {
        let file = SourceFile::new("a.py", "import os\n\n   \nprint(os.name)\n");
        assert_eq!(file.lines_of_code(), 2);
        assert_eq!(SourceFile::new("b.py", "").lines_of_code(), 0);
    }
}
