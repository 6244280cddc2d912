//! modelscore CLI
//!
//! Scores published ML models for trustworthiness.
//!
//! ## Targets
//!
//! - `install`: make sure the static-analysis tool is installed
//! - `test`: run the test suite and print a pass summary
//! - `URL_FILE`: score every model line and print one NDJSON record each

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use modelscore_core::{init_tracing, Verbosity, DEFAULT_PARALLELISM};

mod bootstrap;
mod process;
mod selftest;
mod settings;

use process::{RunOptions, RunOutcome};

const USAGE_EXIT: u8 = 2;
const INTERRUPTED_EXIT: u8 = 130;

#[derive(Parser)]
#[command(name = "modelscore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Trustworthiness scoring for published ML models", long_about = None)]
struct Cli {
    /// `install`, `test`, or a path to a newline-delimited URL file
    target: Option<String>,

    /// Where to write NDJSON records (`-` for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Maximum number of metrics evaluated concurrently
    #[arg(short, long, default_value_t = DEFAULT_PARALLELISM, value_parser = parse_parallelism)]
    parallelism: usize,

    /// JSON file mapping metric names to weights
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Per-metric deadline in seconds
    #[arg(long)]
    metric_timeout: Option<u64>,

    /// Existing file that receives log lines
    #[arg(long, env = "LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log verbosity: 0 silent, 1 info, 2 debug
    #[arg(long, env = "LOG_LEVEL", default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    log_level: u8,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

fn parse_parallelism(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Target {
    Install,
    SelfTest,
    UrlFile(PathBuf),
}

impl Target {
    fn resolve(raw: &str) -> Option<Self> {
        match raw {
            "install" => Some(Target::Install),
            "test" => Some(Target::SelfTest),
            path if Path::new(path).is_file() => Some(Target::UrlFile(PathBuf::from(path))),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(raw) = cli.target.as_deref() else {
        eprintln!("Missing positional argument: install | test | URL_FILE");
        return ExitCode::from(USAGE_EXIT);
    };
    let Some(target) = Target::resolve(raw) else {
        eprintln!("Target must be a path to a URL file, `install`, or `test`: {raw}");
        return ExitCode::from(USAGE_EXIT);
    };

    match run(&cli, target).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "run failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, target: Target) -> Result<ExitCode> {
    let log_file = cli
        .log_file
        .as_deref()
        .map(settings::open_log_file)
        .transpose()?;
    init_tracing(cli.json, Verbosity::from_level(cli.log_level), log_file);

    match target {
        Target::Install => {
            bootstrap::install().await?;
            Ok(ExitCode::SUCCESS)
        }
        Target::SelfTest => {
            let passed = selftest::run().await?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Target::UrlFile(url_file) => {
            let options = RunOptions {
                url_file,
                output: cli.output.clone(),
                parallelism: cli.parallelism,
                weights: cli.weights.clone(),
                metric_deadline: cli.metric_timeout.map(Duration::from_secs),
            };
            match process::run(&options).await? {
                RunOutcome::Completed(_) => Ok(ExitCode::SUCCESS),
                RunOutcome::Interrupted => Ok(ExitCode::from(INTERRUPTED_EXIT)),
            }
        }
    }
}
