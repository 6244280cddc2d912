//! Provider configuration, read once from the environment at startup.

use std::time::Duration;

use modelscore_core::{ConfigError, UpstreamError};

pub const DEFAULT_HF_ENDPOINT: &str = "https://huggingface.co";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_COMPLETION_URL: &str = "https://genai.rcac.purdue.edu/api/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "llama3.1:latest";
pub const DEFAULT_ANALYZER_COMMAND: &str = "flake8";

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const COMPLETION_API_KEY_VAR: &str = "GEN_AI_STUDIO_API_KEY";

const USER_AGENT: &str = concat!("modelscore/", env!("CARGO_PKG_VERSION"));

/// Endpoints, credentials and timeouts for every upstream collaborator.
///
/// Shared read-only by all adapters once built.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub hf_endpoint: String,
    pub github_api_url: String,
    pub github_raw_url: String,
    pub github_token: Option<String>,
    pub completion_url: String,
    pub completion_model: String,
    pub completion_api_key: Option<String>,
    pub http_timeout: Duration,
    pub completion_timeout: Duration,
    pub analyzer_command: String,
    pub analyzer_timeout: Duration,
    /// Concurrent raw-file downloads per repository.
    pub download_concurrency: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hf_endpoint: DEFAULT_HF_ENDPOINT.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_raw_url: DEFAULT_GITHUB_RAW_URL.to_string(),
            github_token: None,
            completion_url: DEFAULT_COMPLETION_URL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            completion_api_key: None,
            http_timeout: Duration::from_secs(20),
            completion_timeout: Duration::from_secs(30),
            analyzer_command: DEFAULT_ANALYZER_COMMAND.to_string(),
            analyzer_timeout: Duration::from_secs(120),
            download_concurrency: 8,
        }
    }
}

fn env_or(var: &str, default: &str) -> String {
    non_empty_env(var).unwrap_or_else(|| default.to_string())
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProviderConfig {
    /// Read endpoints and credentials from environment variables.
    pub fn from_env() -> Self {
        Self {
            hf_endpoint: env_or("HF_ENDPOINT", DEFAULT_HF_ENDPOINT),
            github_api_url: env_or("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            github_raw_url: env_or("GITHUB_RAW_URL", DEFAULT_GITHUB_RAW_URL),
            github_token: non_empty_env(GITHUB_TOKEN_VAR),
            completion_url: env_or("GEN_AI_STUDIO_URL", DEFAULT_COMPLETION_URL),
            completion_model: env_or("GEN_AI_STUDIO_MODEL", DEFAULT_COMPLETION_MODEL),
            completion_api_key: non_empty_env(COMPLETION_API_KEY_VAR),
            ..Self::default()
        }
    }

    pub fn with_hf_endpoint(mut self, url: &str) -> Self {
        self.hf_endpoint = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_github_api_url(mut self, url: &str) -> Self {
        self.github_api_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_github_raw_url(mut self, url: &str) -> Self {
        self.github_raw_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_github_token(mut self, token: &str) -> Self {
        self.github_token = Some(token.to_string());
        self
    }

    pub fn with_completion_url(mut self, url: &str) -> Self {
        self.completion_url = url.to_string();
        self
    }

    pub fn with_completion_api_key(mut self, key: &str) -> Self {
        self.completion_api_key = Some(key.to_string());
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn with_analyzer_command(mut self, command: &str) -> Self {
        self.analyzer_command = command.to_string();
        self
    }

    /// The source-forge token, which every run requires.
    pub fn require_github_token(&self) -> Result<&str, ConfigError> {
        self.github_token
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                variable: GITHUB_TOKEN_VAR,
            })
    }

    /// HTTP client shared by the hub and forge adapters.
    pub fn http_client(&self) -> Result<reqwest::Client, UpstreamError> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| UpstreamError::Http {
                service: "http-client",
                detail: e.to_string(),
            })
    }
}
