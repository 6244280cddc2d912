//! Static analysis through the `flake8` command-line tool.
//!
//! Sources are written to a scratch directory and analyzed with
//! `flake8 --count --exit-zero --ignore=E501 .`; the last stdout line
//! carries the total issue count.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use modelscore_core::{SourceFile, StaticAnalyzer, UpstreamError, UpstreamResult};

use crate::config::ProviderConfig;

const ANALYZER_ARGS: [&str; 4] = ["--count", "--exit-zero", "--ignore=E501", "."];

/// Runs flake8 (or a compatible command) over fetched sources.
#[derive(Debug, Clone)]
pub struct Flake8Analyzer {
    command: String,
    timeout: Duration,
}

impl Flake8Analyzer {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            command: config.analyzer_command.clone(),
            timeout: config.analyzer_timeout,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether `<command> --version` runs successfully.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn tool_error(&self, detail: impl Into<String>) -> UpstreamError {
        UpstreamError::Tool {
            tool: self.command.clone(),
            detail: detail.into(),
        }
    }

    async fn run_in(&self, dir: &Path) -> UpstreamResult<u64> {
        let child = Command::new(&self.command)
            .args(ANALYZER_ARGS)
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.tool_error(format!("could not start: {e}")))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| UpstreamError::Timeout {
                service: "static-analysis",
                after_ms: self.timeout.as_millis() as u64,
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.tool_error(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        parse_issue_count(&stdout)
            .ok_or_else(|| UpstreamError::malformed("static-analysis", "no issue count in output"))
    }
}

/// Total from the last non-empty stdout line; an empty output means zero.
pub fn parse_issue_count(stdout: &str) -> Option<u64> {
    match stdout.lines().rev().find(|l| !l.trim().is_empty()) {
        Some(last) => last.trim().parse().ok(),
        None => Some(0),
    }
}

/// Flattened scratch file name, unique per input position.
fn scratch_name(idx: usize, path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    format!("{idx:04}_{base}")
}

#[async_trait]
impl StaticAnalyzer for Flake8Analyzer {
    async fn count_issues(&self, files: &[SourceFile]) -> UpstreamResult<u64> {
        if files.is_empty() {
            return Ok(0);
        }
        let dir = tempfile::tempdir()?;
        for (idx, file) in files.iter().enumerate() {
            tokio::fs::write(dir.path().join(scratch_name(idx, &file.path)), &file.contents)
                .await?;
        }
        let issues = self.run_in(dir.path()).await?;
        debug!(files = files.len(), issues = issues, "static analysis finished");
        Ok(issues)
    }
}
