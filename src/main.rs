// src/main.rs

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use mvncopy::config::{self, ConfigFile, Settings};
use mvncopy::pipeline::{self, RunRequest};
use mvncopy::progress::{CliProgress, LogProgress, ProgressTracker, SilentProgress};
use mvncopy::repository::{self, HttpClient, MavenClient};
use mvncopy::resolver::LockGroup;
use mvncopy::transfer::ArtifactTransfer;
use std::process::ExitCode;
use tracing::info;

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let file = match cli.config {
        Some(ref path) => config::parse_config_file(path)?,
        None => ConfigFile::default(),
    };
    let settings = Settings::resolve(cli.overrides(), file)?;

    let repositories = repository::repository_list(&settings.repositories)
        .context("Failed to build repository list")?;
    for repo in &repositories {
        info!("Repository: {}", repo);
    }
    let lock_groups = LockGroup::compile_all(&settings.lock_groups)?;

    let http = HttpClient::new()?;
    let client = MavenClient::with_http(http.clone());
    let transfer = ArtifactTransfer::new(http);

    let request = RunRequest {
        packages: settings.packages,
        repositories,
        target_dir: settings.target_dir,
        lock_groups,
    };

    let progress: Box<dyn ProgressTracker> = if cli.quiet || cli.json {
        Box::new(SilentProgress::new())
    } else if cli.verbose {
        Box::new(LogProgress::new("Copying artifacts", 0))
    } else {
        Box::new(CliProgress::new("Copying artifacts", 0))
    };

    let report = pipeline::run(&client, &transfer, &request, progress.as_ref())?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", report);
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
