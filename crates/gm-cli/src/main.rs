use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use gm_cli::commands::{
    absent, add, check, conflict, drop, import, list, task, update, workload,
};
use gm_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Check(args)) => check::run(&mut out, args)?,
        Some(Commands::Conflict(args)) => {
            // Exit status 1 signals an overlap, like `diff` or `cmp`.
            if conflict::run(&mut out, args)? {
                out.flush()?;
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Workload(args)) => workload::run(&mut out, args)?,
        Some(Commands::Add(args)) => {
            let config = load_config(cli.config.as_deref())?;
            add::run(&mut out, args, &config)?;
        }
        Some(Commands::Update(args)) => {
            let config = load_config(cli.config.as_deref())?;
            update::run(&mut out, args, &config)?;
        }
        Some(Commands::List(args)) => {
            let config = load_config(cli.config.as_deref())?;
            list::run(&mut out, args, &config)?;
        }
        Some(Commands::Drop(args)) => {
            let config = load_config(cli.config.as_deref())?;
            drop::run(&mut out, args, &config)?;
        }
        Some(Commands::Absent(args)) => {
            let config = load_config(cli.config.as_deref())?;
            absent::run(&mut out, args, &config)?;
        }
        Some(Commands::Import(args)) => {
            let config = load_config(cli.config.as_deref())?;
            let stdin = io::stdin();
            let report = import::run(stdin.lock(), &mut out, args, &config)?;
            if report.created_count == 0 && !report.errors.is_empty() {
                out.flush()?;
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Task { action }) => {
            let config = load_config(cli.config.as_deref())?;
            task::run(&mut out, action, &config)?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
