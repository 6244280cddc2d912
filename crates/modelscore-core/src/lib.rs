//! modelscore core library
//!
//! Evaluates machine-learning models (with their linked datasets and code
//! repositories) against eight independent trust metrics and folds them
//! into one weighted net score per model.
//!
//! - [`MetricUnit`]: the contract every metric implements
//! - [`MetricRunner`]: timing and failure containment for one unit
//! - [`Orchestrator`]: parallel fan-out/fan-in for one subject
//! - [`OutputRecord`]: the emitted NDJSON record
//!
//! Upstream data sources are reached through the traits in [`providers`];
//! [`fakes`] supplies in-memory implementations for tests.

pub mod counters;
pub mod error;
pub mod fakes;
pub mod input;
pub mod metric;
pub mod metrics;
pub mod obs;
pub mod orchestrator;
pub mod output;
pub mod providers;
pub mod result;
pub mod runner;
pub mod score;
pub mod subject;
pub mod telemetry;
pub mod weights;

pub use error::{ConfigError, InputError, UpstreamError, UpstreamResult};
pub use input::{parse_line, parse_url_file, parse_url_text, UrlLine};
pub use metric::MetricUnit;
pub use metrics::{standard_units, Collaborators, STANDARD_METRICS};
pub use orchestrator::{compute_net_score, Orchestrator, OrchestratorConfig, DEFAULT_PARALLELISM};
pub use output::OutputRecord;
pub use providers::{
    CompletionService, ModelHub, ModelInfo, SourceFile, SourceForge, StaticAnalyzer,
};
pub use result::{Category, CompositeResult, MetricResult};
pub use runner::{MetricRunner, RunFailure};
pub use score::{HardwareTier, RawData, Score, ScoreShape, TierScores};
pub use subject::{EvaluationSubject, LinkSource, SubjectIdentifier, SubjectKind};
pub use telemetry::{init_tracing, Verbosity};
pub use weights::WeightTable;

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
