//! `install`: make sure the static-analysis tool is available.

use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::info;

use modelscore_providers::{Flake8Analyzer, ProviderConfig};

const PIP_INSTALL: [&str; 5] = ["-m", "pip", "install", "--user", "flake8"];

pub async fn install() -> Result<()> {
    let analyzer = Flake8Analyzer::new(&ProviderConfig::from_env());
    if analyzer.is_available().await {
        println!("{} is already installed.", analyzer.command());
        return Ok(());
    }

    info!(command = analyzer.command(), "installing static-analysis tool");
    let status = Command::new("python3")
        .args(PIP_INSTALL)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .context("failed to run python3 -m pip")?;
    if !status.success() {
        bail!("pip install exited with {status}");
    }
    if !analyzer.is_available().await {
        bail!(
            "{} is still not runnable; make sure the pip user bin directory is on PATH",
            analyzer.command()
        );
    }
    println!("Installed {}.", analyzer.command());
    Ok(())
}
