//! Scoring a URL file: one NDJSON record per subject, in input order.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use modelscore_core::counters::COUNTERS;
use modelscore_core::{
    obs, parse_url_file, standard_units, Orchestrator, OrchestratorConfig, OutputRecord, UrlLine,
};
use modelscore_providers::{build_providers, ProviderConfig};

use crate::settings;

/// Options for one scoring run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub url_file: PathBuf,
    /// `-` for stdout.
    pub output: String,
    pub parallelism: usize,
    pub weights: Option<PathBuf>,
    pub metric_deadline: Option<Duration>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub evaluated: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    Interrupted,
}

fn open_output(output: &str) -> Result<Box<dyn Write + Send>> {
    if output == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(Path::new(output))
        .with_context(|| format!("failed to create output file {output}"))?;
    Ok(Box::new(file))
}

/// Validate configuration, then score every line of the URL file.
pub async fn run(options: &RunOptions) -> Result<RunOutcome> {
    let lines = parse_url_file(&options.url_file)
        .with_context(|| format!("failed to read {}", options.url_file.display()))?;
    let weights = settings::load_weights(options.weights.as_deref())?;

    let config = ProviderConfig::from_env();
    config.require_github_token()?;
    let providers = build_providers(&config).context("failed to build upstream clients")?;
    providers.github.verify_token().await?;

    let orchestrator = Orchestrator::new(
        standard_units(&providers.collaborators),
        &weights,
        OrchestratorConfig {
            parallelism: options.parallelism,
            metric_deadline: options.metric_deadline,
        },
    )?;

    let mut out = open_output(&options.output)?;
    info!(
        lines = lines.len(),
        parallelism = options.parallelism,
        metrics = ?orchestrator.metric_names(),
        "scoring URL file"
    );

    let outcome = tokio::select! {
        summary = evaluate_lines(&orchestrator, lines, &mut out) => RunOutcome::Completed(summary?),
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            RunOutcome::Interrupted
        }
    };
    if let RunOutcome::Completed(summary) = outcome {
        info!(
            evaluated = summary.evaluated,
            skipped = summary.skipped,
            "URL file scored"
        );
    }
    COUNTERS.flush();
    Ok(outcome)
}

/// Evaluate each line with a usable model link and write its record.
///
/// Records are flushed as they are produced, so an interrupted run keeps
/// every line already written.
pub async fn evaluate_lines<W: Write>(
    orchestrator: &Orchestrator,
    lines: Vec<UrlLine>,
    out: &mut W,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for line in lines {
        let line_no = line.line_no;
        let Some(subject) = line.into_subject() else {
            obs::emit_subject_skipped(line_no, "no model link");
            COUNTERS.inc_subjects_skipped();
            summary.skipped += 1;
            continue;
        };

        let composite = orchestrator.evaluate(&subject).await;
        let record = OutputRecord::from(&composite).to_json_line()?;
        writeln!(out, "{record}").context("failed to write output record")?;
        out.flush().context("failed to flush output")?;
        summary.evaluated += 1;
    }
    Ok(summary)
}
