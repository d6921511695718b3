//! Delete and clear commands.

use std::io::Write;

use anyhow::Result;
use tl_store::{TaskRepository, TaskService};

use super::util::parse_id;

pub fn run<W: Write, R: TaskRepository>(
    writer: &mut W,
    service: &mut TaskService<R>,
    id: &str,
) -> Result<()> {
    let id = parse_id(id)?;
    service.delete_task(&id)?;
    writeln!(writer, "Deleted {id}")?;
    Ok(())
}

pub fn clear<W: Write, R: TaskRepository>(writer: &mut W, service: &mut TaskService<R>) -> Result<()> {
    service.delete_tasks()?;
    writeln!(writer, "All tasks deleted")?;
    Ok(())
}
