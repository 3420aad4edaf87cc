//! Dayflow CLI application.

mod args;
mod cli;
mod renderer;

use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use args::{Args, Commands, ServeArgs};
use clap::Parser;
use cli::Cli;
use dayflow_core::{PlannerBuilder, PlannerError};
use dayflow_relay::RelayConfig;
use log::info;
use renderer::TerminalRenderer;

/// Overrides the model API root, e.g. for a local mock.
const LLM_BASE_URL_ENV: &str = "DAYFLOW_LLM_BASE_URL";
const LLM_MODEL_ENV: &str = "DAYFLOW_MODEL";
/// Generation request timeout in seconds.
const LLM_TIMEOUT_ENV: &str = "DAYFLOW_TIMEOUT_SECS";

async fn serve(args: ServeArgs) -> Result<()> {
    let config = RelayConfig::from_env().context("Invalid relay configuration")?;
    info!("Starting relay on {}", args.bind);
    dayflow_relay::serve(config, args.bind)
        .await
        .context("Relay server failed")
}

async fn build_cli(database_file: Option<PathBuf>, no_color: bool) -> Result<Cli> {
    let mut builder = PlannerBuilder::new();
    if let Some(path) = database_file {
        builder = builder.with_database_path(path);
    }
    if let Ok(base_url) = env::var(LLM_BASE_URL_ENV) {
        builder = builder.with_llm_base_url(base_url);
    }
    if let Ok(model) = env::var(LLM_MODEL_ENV) {
        builder = builder.with_model(model);
    }
    if let Ok(timeout) = env::var(LLM_TIMEOUT_ENV) {
        let secs = timeout
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{LLM_TIMEOUT_ENV} must be a whole number of seconds"))?;
        builder = builder.with_timeout_secs(secs);
    }
    let planner = builder
        .build()
        .await
        .context("Failed to initialize planner")?;
    info!("Dayflow started");
    Ok(Cli::new(planner, TerminalRenderer::new(!no_color)))
}

async fn run(args: Args) -> Result<()> {
    let Args {
        database_file,
        no_color,
        command,
    } = args;

    match command {
        Some(Commands::Serve(serve_args)) => serve(serve_args).await,
        Some(Commands::Task { command }) => {
            build_cli(database_file, no_color)
                .await?
                .handle_task_command(command)
                .await
        }
        Some(Commands::Plan { command }) => {
            build_cli(database_file, no_color)
                .await?
                .handle_plan_command(command)
                .await
        }
        Some(Commands::History { command }) => {
            build_cli(database_file, no_color)
                .await?
                .handle_history_command(command)
                .await
        }
        Some(Commands::Config { command }) => {
            build_cli(database_file, no_color)
                .await?
                .handle_config_command(command)
                .await
        }
        Some(Commands::Sync { command }) => {
            build_cli(database_file, no_color)
                .await?
                .handle_sync_command(command)
                .await
        }
        None => build_cli(database_file, no_color).await?.list_tasks().await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let result = run(Args::parse()).await;
    if let Err(e) = &result {
        if e
            .downcast_ref::<PlannerError>()
            .is_some_and(PlannerError::needs_credential_setup)
        {
            eprintln!("Hint: store a Gemini API key with `dayflow config set-key <KEY>`");
        }
    }
    result
}
