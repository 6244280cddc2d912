//! Error taxonomy for the scoring engine.
//!
//! Only [`ConfigError`] may abort the process. [`UpstreamError`] is always
//! contained by the metric runner and degrades to a zero score.

use std::path::PathBuf;

/// Failures talking to an external collaborator (model hub, source forge,
/// completion endpoint, static-analysis tool).
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {detail}")]
    Http { service: &'static str, detail: String },

    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("missing credential: {variable} is not set")]
    MissingCredential { variable: &'static str },

    #[error("malformed {service} payload: {detail}")]
    MalformedPayload { service: &'static str, detail: String },

    #[error("{service} timed out after {after_ms} ms")]
    Timeout { service: &'static str, after_ms: u64 },

    #[error("unsupported: {detail}")]
    Unsupported { detail: String },

    #[error("{tool} failed: {detail}")]
    Tool { tool: String, detail: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UpstreamError {
    pub fn malformed(service: &'static str, detail: impl Into<String>) -> Self {
        Self::MalformedPayload {
            service,
            detail: detail.into(),
        }
    }

    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self::Unsupported {
            detail: detail.into(),
        }
    }
}

/// Fatal configuration problems, detected before any subject is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no weight configured for metric '{metric}'")]
    MissingWeight { metric: String },

    #[error("weight for metric '{metric}' must be finite and non-negative, got {weight}")]
    InvalidWeight { metric: String, weight: f64 },

    #[error("weight configured for unknown metric '{metric}'")]
    UnknownWeight { metric: String },

    #[error("metric weights sum to {total}, which exceeds 1")]
    WeightTotal { total: f64 },

    #[error("metric '{metric}' is registered more than once")]
    DuplicateMetric { metric: String },

    #[error("missing required credential: {variable}")]
    MissingCredential { variable: &'static str },

    #[error("credential {variable} was rejected: {reason}")]
    InvalidCredential {
        variable: &'static str,
        reason: String,
    },

    #[error("log file {path:?}: {reason}")]
    LogFile { path: PathBuf, reason: String },

    #[error("weights file {path:?}: {reason}")]
    WeightsFile { path: PathBuf, reason: String },
}

/// Errors reading the newline-delimited URL input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("URL file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for collaborator calls.
pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;
