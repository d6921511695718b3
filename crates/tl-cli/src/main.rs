use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;
use tracing_subscriber::EnvFilter;

use tl_cli::commands::{delete, export, list, status, track};
use tl_cli::{Cli, Commands, Config};
use tl_store::{TaskRepository, TaskService};

/// Load config and build the task service, ensuring the store's directory exists.
fn open_service(config_path: Option<&Path>) -> Result<TaskService<Box<dyn TaskRepository>>> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.store_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create store directory")?;
    }

    let calendar = config.calendar();
    let repository = config.store_format.open_file(&config.store_path, &calendar);
    Ok(TaskService::new(repository).with_calendar(calendar))
}

fn main() -> Result<()> {
    // Exits early when invoked by a shell asking for completions
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let mut service = open_service(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Start { id } => track::start(&mut stdout, &mut service, id)?,
        Commands::Stop { id } => track::stop(&mut stdout, &mut service, id)?,
        Commands::Switch { id } => track::switch(&mut stdout, &mut service, id)?,
        Commands::Status { id } => status::run(&mut stdout, &mut service, id.as_deref(), Utc::now())?,
        Commands::List { json } => list::run(&mut stdout, &mut service, *json, Utc::now())?,
        Commands::Delete { id } => delete::run(&mut stdout, &mut service, id)?,
        Commands::Clear => delete::clear(&mut stdout, &mut service)?,
        Commands::Export(args) => export::run(&mut stdout, &mut service, args)?,
    }

    Ok(())
}
