//! Shared utilities for CLI commands.

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use tl_core::{Task, TaskId};

/// Validates a task identifier given on the command line.
pub fn parse_id(id: &str) -> Result<TaskId> {
    Ok(TaskId::new(id)?)
}

/// Formats a duration as `<h>h:<m>m:<s>s`, truncated to whole seconds.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}h:{minutes}m:{seconds}s")
}

/// One display line for `task`, with running activities measured up to `now`.
pub fn task_line(task: &Task, now: DateTime<Utc>) -> String {
    let running = if task.is_running() { " (running)" } else { "" };
    format!(
        "{}    {}{running}",
        format_duration(task.duration_at(now)),
        task.identifier
    )
}
