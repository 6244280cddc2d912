//! Upstream adapters for modelscore.
//!
//! - [`HfHubClient`]: model metadata and README text from the Hugging Face Hub
//! - [`GithubClient`]: contributors and Python sources from GitHub
//! - [`ChatCompletionClient`]: hosted chat completions for judged metrics
//! - [`Flake8Analyzer`]: issue counts from the `flake8` tool
//!
//! All adapters are configured from one [`ProviderConfig`].

use std::sync::Arc;

use modelscore_core::{Collaborators, UpstreamError, UpstreamResult};

pub mod completion;
pub mod config;
pub mod flake8;
pub mod github;
pub mod huggingface;

pub use completion::ChatCompletionClient;
pub use config::ProviderConfig;
pub use flake8::Flake8Analyzer;
pub use github::GithubClient;
pub use huggingface::HfHubClient;

pub(crate) fn http_error(service: &'static str, err: reqwest::Error) -> UpstreamError {
    UpstreamError::Http {
        service,
        detail: err.to_string(),
    }
}

/// Network-backed collaborators, plus the forge client for token checks.
pub struct Providers {
    pub collaborators: Collaborators,
    pub github: Arc<GithubClient>,
}

/// Build every adapter from `config`.
pub fn build_providers(config: &ProviderConfig) -> UpstreamResult<Providers> {
    let github = Arc::new(GithubClient::new(config)?);
    let collaborators = Collaborators {
        hub: Arc::new(HfHubClient::new(config)?),
        forge: github.clone(),
        completion: Arc::new(ChatCompletionClient::new(config)?),
        analyzer: Arc::new(Flake8Analyzer::new(config)),
    };
    Ok(Providers {
        collaborators,
        github,
    })
}
