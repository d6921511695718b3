//! Status command: one task, or everything currently running.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use tl_store::{TaskRepository, TaskService};

use super::util::{parse_id, task_line};

pub fn run<W: Write, R: TaskRepository>(
    writer: &mut W,
    service: &mut TaskService<R>,
    id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(id) = id {
        let id = parse_id(id)?;
        let Some(task) = service.get_task(&id)? else {
            bail!("task {id} not found");
        };
        writeln!(writer, "{}", task_line(&task, now))?;
        return Ok(());
    }

    let tasks = service.get_tasks()?;
    let mut any = false;
    for task in tasks.running() {
        writeln!(writer, "{}", task_line(task, now))?;
        any = true;
    }
    if !any {
        writeln!(writer, "No running tasks")?;
    }
    Ok(())
}
