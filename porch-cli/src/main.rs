//! Porch CLI
//!
//! Command-line client for the porch pipeline orchestration server.
//! Sends one action per invocation and prints the server's JSON reply
//! to stdout.

mod config;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::*;
use porch_client::{ActionDescriptor, Dispatcher};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DEFAULT_SECTION};

#[derive(Parser)]
#[command(name = "porch")]
#[command(about = "Pipeline Orchestration (porch) API client", long_about = None)]
#[command(after_help = "The server JSON reply is printed to STDOUT. \
    Set NPG_PORCH_TOKEN to an admin or pipeline token.")]
struct Cli {
    /// Action to send to the server: list_tasks, list_pipelines, add_pipeline,
    /// add_task, claim_task or update_task
    action: String,

    /// Server base URL
    #[arg(long, env = "PORCH_BASE_URL")]
    base_url: Option<String>,

    /// Do not validate the server's CA certificate
    #[arg(long = "no-validate-ca-cert", action = ArgAction::SetFalse)]
    validate_ca_cert: bool,

    /// Pipeline name
    #[arg(long)]
    pipeline: Option<String>,

    /// Pipeline git project URL
    #[arg(long)]
    pipeline_url: Option<String>,

    /// Pipeline version
    #[arg(long)]
    pipeline_version: Option<String>,

    /// Task input as JSON
    #[arg(long)]
    task_json: Option<String>,

    /// New task status
    #[arg(long)]
    status: Option<String>,

    /// Config file (INI or JSON) supplying defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Section of the config file to read
    #[arg(long, default_value = DEFAULT_SECTION)]
    config_section: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "porch_cli=warn,porch_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = match &cli.config {
        Some(path) => Some(
            config::load(path, &cli.config_section)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
        ),
        None => None,
    };

    let config = Config {
        base_url: cli.base_url,
        pipeline_name: cli.pipeline,
        pipeline_uri: cli.pipeline_url,
        pipeline_version: cli.pipeline_version,
        token: None,
    }
    .with_file(file);
    debug!(base_url = ?config.base_url, action = %cli.action, "Resolved configuration");

    let mut builder = ActionDescriptor::builder()
        .action(cli.action)
        .verify_tls(cli.validate_ca_cert);
    if let Some(base_url) = &config.base_url {
        builder = builder.base_url(base_url.as_str());
    }
    if let Some(task_json) = cli.task_json {
        builder = builder.task_json(task_json);
    }
    if let Some(status) = cli.status {
        builder = builder.task_status(status);
    }

    let descriptor = builder.build().await?;
    let pipeline = config.pipeline()?;

    let reply = Dispatcher::new(config.credentials())
        .dispatch(&descriptor, pipeline.as_ref())
        .await?;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
