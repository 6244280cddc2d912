//! `test`: run the workspace test suite and summarize it.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;

/// Passed and failed counts summed over every `test result:` line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TestSummary {
    pub passed: u64,
    pub failed: u64,
}

impl TestSummary {
    pub fn total(&self) -> u64 {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.total() > 0
    }
}

fn count_before(segment: &str, label: &str) -> Option<u64> {
    let segment = segment.trim();
    segment
        .strip_suffix(label)
        .and_then(|n| n.trim().parse().ok())
}

/// Sum libtest's `test result: ok. 12 passed; 0 failed; ...` lines.
pub fn summarize(output: &str) -> TestSummary {
    let mut summary = TestSummary::default();
    for line in output.lines() {
        let Some((_, rest)) = line.split_once("test result:") else {
            continue;
        };
        let rest = rest.split_once('.').map(|(_, r)| r).unwrap_or(rest);
        for segment in rest.split(';') {
            if let Some(n) = count_before(segment, "passed") {
                summary.passed += n;
            } else if let Some(n) = count_before(segment, "failed") {
                summary.failed += n;
            }
        }
    }
    summary
}

pub async fn run() -> Result<bool> {
    let output = Command::new("cargo")
        .args(["test", "--workspace"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .context("failed to run cargo test")?;

    let text = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let summary = summarize(&text);
    println!(
        "{}/{} test cases passed.",
        summary.passed,
        summary.total()
    );
    Ok(output.status.success() && summary.all_passed())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
running 3 tests
test a ... ok
test result: ok. 3 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.01s

running 2 tests
test result: FAILED. 1 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.00s

test result: ok. 0 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.00s
";

    #[test]
    fn sums_every_result_line() {
        let summary = summarize(OUTPUT);
        assert_eq!(summary, TestSummary { passed: 4, failed: 1 });
        assert_eq!(summary.total(), 5);
        assert!(!summary.all_passed());
    }

    #[test]
    fn empty_run_is_not_a_pass() {
        assert!(!summarize("").all_passed());
        assert!(summarize("test result: ok. 2 passed; 0 failed;").all_passed());
    }
}
