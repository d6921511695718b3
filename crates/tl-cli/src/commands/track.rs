//! Start, stop and switch commands.

use std::io::Write;

use anyhow::Result;
use tl_store::{TaskRepository, TaskService};

use super::util::parse_id;

pub fn start<W: Write, R: TaskRepository>(
    writer: &mut W,
    service: &mut TaskService<R>,
    id: &str,
) -> Result<()> {
    let id = parse_id(id)?;
    service.start_task(&id)?;
    writeln!(writer, "Started tracking {id}")?;
    Ok(())
}

pub fn stop<W: Write, R: TaskRepository>(
    writer: &mut W,
    service: &mut TaskService<R>,
    id: &str,
) -> Result<()> {
    let id = parse_id(id)?;
    service.pause_task(&id)?;
    writeln!(writer, "Stopped tracking {id}")?;
    Ok(())
}

pub fn switch<W: Write, R: TaskRepository>(
    writer: &mut W,
    service: &mut TaskService<R>,
    id: &str,
) -> Result<()> {
    let id = parse_id(id)?;
    service.switch_task(&id)?;
    writeln!(writer, "Switched to {id}")?;
    Ok(())
}
