//! Export command.

use std::io::Write;
use std::path::{self, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::engine::ArgValueCandidates;
use tl_store::{Format, TaskRepository, TaskService};

use super::complete::format_candidates;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output format: csv, ical or ics.
    #[arg(add = ArgValueCandidates::new(format_candidates))]
    pub format: Option<String>,
    /// Destination file; defaults to `./tasklog.<ext>`.
    pub path: Option<PathBuf>,
}

pub fn run<W: Write, R: TaskRepository>(
    writer: &mut W,
    service: &mut TaskService<R>,
    args: &ExportArgs,
) -> Result<()> {
    let format = match &args.format {
        Some(token) => token.parse::<Format>()?,
        None => Format::Csv,
    };
    let destination = args
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("./tasklog{}", format.extension())));
    let destination = path::absolute(&destination)
        .with_context(|| format!("failed to resolve {}", destination.display()))?;

    service
        .export(format, &destination)
        .with_context(|| format!("failed to export to {}", destination.display()))?;
    writeln!(writer, "Exported tasks to {}", destination.display())?;
    Ok(())
}
