//! List command.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tl_core::{Activity, TaskCollection};
use tl_store::{TaskRepository, TaskService};

use super::util::task_line;

/// JSON shape of one listed task.
#[derive(Debug, Serialize)]
struct TaskEntry<'a> {
    identifier: &'a str,
    duration_seconds: i64,
    running: bool,
    activities: &'a [Activity],
}

pub fn format_tasks(tasks: &TaskCollection, now: DateTime<Utc>) -> String {
    let mut output = String::new();
    for task in tasks {
        output.push_str(&task_line(task, now));
        output.push('\n');
    }
    output
}

pub fn format_tasks_json(tasks: &TaskCollection, now: DateTime<Utc>) -> Result<String> {
    let entries: Vec<_> = tasks
        .iter()
        .map(|task| TaskEntry {
            identifier: &task.identifier,
            duration_seconds: task.duration_at(now).num_seconds(),
            running: task.is_running(),
            activities: &task.activities,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

pub fn run<W: Write, R: TaskRepository>(
    writer: &mut W,
    service: &mut TaskService<R>,
    json: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let tasks = service.get_tasks()?;
    if json {
        writeln!(writer, "{}", format_tasks_json(&tasks, now)?)?;
    } else {
        write!(writer, "{}", format_tasks(&tasks, now))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use tl_core::Task;

    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn tasks() -> TaskCollection {
        TaskCollection::from_iter([
            Task::with_activities(
                "first-task",
                vec![
                    Activity::closed(at("2019-01-01T10:00:00Z"), at("2019-01-01T10:01:00Z")),
                    Activity::closed(at("2019-01-01T10:02:00Z"), at("2019-01-01T10:06:00Z")),
                ],
            ),
            Task::with_activities(
                "second-task",
                vec![Activity::closed(at("2019-01-01T10:00:00Z"), at("2019-01-01T10:04:00Z"))],
            ),
            Task::with_activities(
                "last-task",
                vec![Activity::running(at("2019-01-01T10:00:00Z"))],
            ),
        ])
    }

    #[test]
    fn test_list_empty() {
        assert_eq!(format_tasks(&TaskCollection::new(), at("2019-01-01T12:00:00Z")), "");
    }

    #[test]
    fn test_list_in_collection_order() {
        let output = format_tasks(&tasks(), at("2019-01-01T11:00:00Z"));
        assert_snapshot!(output, @r"
        0h:5m:0s    first-task
        0h:4m:0s    second-task
        1h:0m:0s    last-task (running)
        ");
    }

    #[test]
    fn test_list_json() {
        let tasks = TaskCollection::from_iter(tasks().into_iter().skip(1));
        let output = format_tasks_json(&tasks, at("2019-01-01T11:00:00Z")).unwrap();
        assert_snapshot!(output, @r#"
        [
          {
            "identifier": "second-task",
            "duration_seconds": 240,
            "running": false,
            "activities": [
              {
                "start": "2019-01-01T10:00:00Z",
                "end": "2019-01-01T10:04:00Z"
              }
            ]
          },
          {
            "identifier": "last-task",
            "duration_seconds": 3600,
            "running": true,
            "activities": [
              {
                "start": "2019-01-01T10:00:00Z"
              }
            ]
          }
        ]
        "#);
    }

    #[test]
    fn test_run_reads_through_the_service() {
        let mut service = TaskService::new(tl_store::MemoryRepository::from(tasks()));
        let mut output = Vec::new();
        run(&mut output, &mut service, false, at("2019-01-01T11:00:00Z")).unwrap();
        assert_eq!(String::from_utf8(output).unwrap().lines().count(), 3);
    }
}
