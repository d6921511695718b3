//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::engine::ArgValueCandidates;

use crate::commands::complete::task_candidates;
use crate::commands::export::ExportArgs;

/// Task time tracker.
///
/// Records when named tasks start and stop, reports how long each ran, and
/// exports the history as an event log or a calendar.
///
/// Shell completion: `source <(COMPLETE=bash tl)` (or zsh, fish, ...).
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start tracking a task, creating it if needed.
    Start {
        /// Task identifier (letters, digits, `_` and `-`).
        #[arg(add = ArgValueCandidates::new(task_candidates))]
        id: String,
    },

    /// Stop tracking a task.
    Stop {
        /// Task identifier.
        #[arg(add = ArgValueCandidates::new(task_candidates))]
        id: String,
    },

    /// Stop every other running task and start this one.
    Switch {
        /// Task identifier.
        #[arg(add = ArgValueCandidates::new(task_candidates))]
        id: String,
    },

    /// Show one task, or every running task.
    Status {
        /// Task identifier; defaults to all running tasks.
        #[arg(add = ArgValueCandidates::new(task_candidates))]
        id: Option<String>,
    },

    /// List every task with its tracked time.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a task and its history.
    Delete {
        /// Task identifier.
        #[arg(add = ArgValueCandidates::new(task_candidates))]
        id: String,
    },

    /// Delete every task.
    Clear,

    /// Export all tasks to a file.
    Export(ExportArgs),
}
